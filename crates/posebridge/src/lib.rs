//! Bridge between an external head-tracking producer and a renderer.
//!
//! An XR server streams per-eye pose and FOV records over a local socket.
//! posebridge decodes them into the consumer's coordinate convention, keeps
//! only the newest frame, and turns it into recentred eye poses and off-axis
//! projection matrices. It can also launch and supervise the server itself.
//!
//! # Crate Structure
//!
//! - [`transport`]: Local socket endpoint
//! - [`frame`]: 88-byte pose record codec and handedness conversion
//! - [`listener`]: Reader thread and latest-value frame buffer
//! - [`render`]: Projection matrices, recentring and per-tick views
//! - [`supervisor`]: XR server process launch (behind `supervisor` feature)

/// Re-export transport types.
pub mod transport {
    pub use posebridge_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use posebridge_frame::*;
}

/// Re-export listener types.
pub mod listener {
    pub use posebridge_listener::*;
}

/// Re-export render types.
pub mod render {
    pub use posebridge_render::*;
}

/// Re-export supervisor types (requires `supervisor` feature).
#[cfg(feature = "supervisor")]
pub mod supervisor {
    pub use posebridge_supervisor::*;
}
