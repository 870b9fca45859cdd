use glam::{Quat, Vec3};
use posebridge_frame::{EyePose, PoseFrame};

/// Position and orientation of one eye, without its frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeTransform {
    pub position: Vec3,
    pub orientation: Quat,
}

impl EyeTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

impl From<&EyePose> for EyeTransform {
    fn from(eye: &EyePose) -> Self {
        Self::new(eye.position, eye.orientation)
    }
}

/// Both eyes' transforms for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    pub left: EyeTransform,
    pub right: EyeTransform,
}

impl HeadPose {
    pub fn from_frame(frame: &PoseFrame) -> Self {
        Self {
            left: EyeTransform::from(&frame.left_eye),
            right: EyeTransform::from(&frame.right_eye),
        }
    }

    /// Express this pose relative to a recentre offset.
    ///
    /// Per eye: `position - offset.position` and
    /// `orientation * offset.orientation⁻¹`.
    pub fn relative_to(&self, offset: &HeadsetOffset) -> HeadPose {
        HeadPose {
            left: relative_eye(&self.left, &offset.left),
            right: relative_eye(&self.right, &offset.right),
        }
    }
}

fn relative_eye(eye: &EyeTransform, offset: &EyeTransform) -> EyeTransform {
    EyeTransform {
        position: eye.position - offset.position,
        orientation: eye.orientation * offset.orientation.inverse(),
    }
}

/// Per-eye deltas subtracted from every frame to re-zero tracking.
///
/// The default offset is the identity: frames pass through unchanged until
/// the first recentre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadsetOffset {
    pub left: EyeTransform,
    pub right: EyeTransform,
}

impl Default for HeadsetOffset {
    fn default() -> Self {
        Self {
            left: EyeTransform::IDENTITY,
            right: EyeTransform::IDENTITY,
        }
    }
}

impl HeadsetOffset {
    /// Each eye's own pose as its offset.
    ///
    /// Applying this to the same frame puts both eyes at the origin, which
    /// discards the interpupillary distance. Prefer [`centered`](Self::centered)
    /// for recentring.
    pub fn from_frame(frame: &PoseFrame) -> Self {
        let pose = HeadPose::from_frame(frame);
        Self {
            left: pose.left,
            right: pose.right,
        }
    }

    /// Offset to the midpoint between the eyes.
    ///
    /// Both eyes share one offset: the average position of the two eyes and
    /// the halfway rotation between them. After applying it to the same
    /// frame the eyes sit symmetrically about the origin, keeping their
    /// separation and relative rotation.
    ///
    /// A frame without a usable orientation, such as the zero frame served
    /// before any producer data arrives, recentres orientation to the
    /// identity.
    pub fn centered(frame: &PoseFrame) -> Self {
        let left = &frame.left_eye;
        let right = &frame.right_eye;

        let center = EyeTransform {
            position: (left.position + right.position) * 0.5,
            orientation: halfway(left.orientation, right.orientation),
        };

        tracing::debug!(
            position = ?center.position,
            orientation = ?center.orientation,
            "recentred headset offset"
        );

        Self {
            left: center,
            right: center,
        }
    }
}

fn halfway(left: Quat, right: Quat) -> Quat {
    let mid = left.slerp(right, 0.5);
    let len = mid.length();
    if len.is_finite() && len > 1e-6 {
        mid / len
    } else {
        Quat::IDENTITY
    }
}
