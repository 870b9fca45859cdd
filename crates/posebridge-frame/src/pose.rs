use glam::{Quat, Vec3};

/// Half-angles of one eye's view frustum, in radians from the forward axis.
///
/// Each angle is a magnitude: `left` and `down` are positive for a frustum
/// that extends left of and below the view axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FovAngles {
    pub up: f32,
    pub down: f32,
    pub right: f32,
    pub left: f32,
}

impl FovAngles {
    pub const fn new(up: f32, down: f32, right: f32, left: f32) -> Self {
        Self {
            up,
            down,
            right,
            left,
        }
    }

    /// Same half-angle on all four edges.
    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self::new(vertical, vertical, horizontal, horizontal)
    }

    /// Angles in wire order: up, down, right, left.
    pub fn to_array(self) -> [f32; 4] {
        [self.up, self.down, self.right, self.left]
    }

    pub fn from_array([up, down, right, left]: [f32; 4]) -> Self {
        Self::new(up, down, right, left)
    }

    /// True when the frustum has no vertical or horizontal extent.
    ///
    /// The decoder never rejects such values; callers that build projections
    /// from untrusted producers can check this first.
    pub fn is_degenerate(&self) -> bool {
        !(self.up + self.down > 0.0 && self.left + self.right > 0.0)
    }
}

/// One eye's tracked pose plus its rendering frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePose {
    pub position: Vec3,
    /// Not renormalised; whatever the producer sent, converted.
    pub orientation: Quat,
    pub fov: FovAngles,
}

impl EyePose {
    /// All-zero pose, including a zero (not identity) quaternion.
    pub const ZERO: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::from_xyzw(0.0, 0.0, 0.0, 0.0),
        fov: FovAngles::new(0.0, 0.0, 0.0, 0.0),
    };

    pub fn new(position: Vec3, orientation: Quat, fov: FovAngles) -> Self {
        Self {
            position,
            orientation,
            fov,
        }
    }
}

impl Default for EyePose {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Both eyes for one tracking sample. The unit of transfer and storage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseFrame {
    pub left_eye: EyePose,
    pub right_eye: EyePose,
}

impl PoseFrame {
    /// The value a frame slot holds before anything has been received.
    pub const ZERO: Self = Self {
        left_eye: EyePose::ZERO,
        right_eye: EyePose::ZERO,
    };

    pub fn new(left_eye: EyePose, right_eye: EyePose) -> Self {
        Self {
            left_eye,
            right_eye,
        }
    }
}
