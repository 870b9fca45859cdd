//! Handedness conversion between the producer and the consumer.
//!
//! The producer reports poses in a right-handed, Y-up space (OpenXR). The
//! consumer is left-handed, Y-up. Mirroring Z maps positions across; the
//! rotation quaternion is mirrored by negating its X and Y components, which
//! keeps rotations consistent with the mirrored position space.
//!
//! Both maps are involutions, so the same functions convert in either
//! direction. FOV angles are convention-independent and pass through.

use glam::{Quat, Vec3};

use crate::pose::EyePose;

/// `(x, y, z)` → `(x, y, -z)`.
#[inline]
pub fn convert_position(position: Vec3) -> Vec3 {
    Vec3::new(position.x, position.y, -position.z)
}

/// `(x, y, z, w)` → `(-x, -y, z, w)`. Never renormalises.
#[inline]
pub fn convert_orientation(orientation: Quat) -> Quat {
    Quat::from_xyzw(-orientation.x, -orientation.y, orientation.z, orientation.w)
}

/// Apply both conversions to an eye pose.
pub fn convert_eye(eye: EyePose) -> EyePose {
    EyePose {
        position: convert_position(eye.position),
        orientation: convert_orientation(eye.orientation),
        fov: eye.fov,
    }
}
