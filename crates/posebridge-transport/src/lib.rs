//! Local IPC endpoint for headset pose streams.
//!
//! The producer process connects to a fixed, well-known endpoint and writes an
//! unframed byte stream. On Unix this is a filesystem-path domain socket; other
//! platforms report [`TransportError::Unsupported`].
//!
//! This is the lowest layer of posebridge. Everything else builds on top of
//! the [`IpcStream`] type provided here.

pub mod endpoint;
pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use endpoint::{default_endpoint_path, DEFAULT_ENDPOINT_NAME};
pub use error::{Result, TransportError};
pub use traits::IpcStream;

#[cfg(unix)]
pub use uds::UnixDomainSocket;
