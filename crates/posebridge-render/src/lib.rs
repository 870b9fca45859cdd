//! Consumer-side math for pose frames.
//!
//! - [`projection`] builds asymmetric off-axis perspective matrices from raw
//!   FOV half-angles, parameterised by the target [`ClipConvention`].
//! - [`offset`] re-zeroes tracking against a recentre pose.
//! - [`view`] and [`tracker`] combine both into the per-eye data a renderer
//!   applies each tick.

pub mod clip;
pub mod offset;
pub mod projection;
pub mod tracker;
pub mod view;

pub use clip::{ClipConvention, ClipPlanes, YAxis, ZRange};
pub use offset::{EyeTransform, HeadPose, HeadsetOffset};
pub use projection::{projection_from_fov, projection_from_tangents};
pub use tracker::ViewTracker;
pub use view::{EyeView, StereoView};
