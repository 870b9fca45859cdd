//! Latest-value hand-off between the pose reader thread and a render loop.
//!
//! [`HeadsetListener`] binds the pose endpoint and owns a reader thread that
//! decodes records into a shared [`FrameBuffer`]. The render loop polls the
//! buffer once per tick and never blocks on IPC.

pub mod buffer;
pub mod error;
pub mod listener;

pub use buffer::{FrameBuffer, FrameSource};
pub use error::{ListenerError, Result};
pub use listener::{HeadsetListener, ListenerConfig, ReaderState};
