/// Errors that can occur while setting up a headset listener.
///
/// Failures after the reader thread has started are logged by that thread
/// and reported through [`ReaderState`](crate::ReaderState), never returned.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Transport-level error (bind, socket options).
    #[error("transport error: {0}")]
    Transport(#[from] posebridge_transport::TransportError),

    /// The reader thread could not be started.
    #[error("failed to spawn reader thread: {0}")]
    Spawn(std::io::Error),
}

pub type Result<T> = std::result::Result<T, ListenerError>;
