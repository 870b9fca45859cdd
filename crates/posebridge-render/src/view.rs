use glam::{Mat4, Quat, Vec3};
use posebridge_frame::{EyePose, PoseFrame};

use crate::clip::{ClipConvention, ClipPlanes};
use crate::offset::{EyeTransform, HeadPose, HeadsetOffset};
use crate::projection::projection_from_fov;

/// Everything a renderer needs to draw one eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeView {
    /// Eye position relative to the recentre offset.
    pub position: Vec3,
    pub orientation: Quat,
    pub projection: Mat4,
}

impl EyeView {
    fn new(eye: &EyePose, transform: EyeTransform, planes: ClipPlanes, convention: ClipConvention) -> Self {
        Self {
            position: transform.position,
            orientation: transform.orientation,
            projection: projection_from_fov(eye.fov, planes, convention),
        }
    }

    /// World-to-eye transform for this eye.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }
}

/// Left and right [`EyeView`]s for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoView {
    pub left: EyeView,
    pub right: EyeView,
}

impl StereoView {
    /// Apply `offset` to the frame's eye poses and build each eye's projection.
    pub fn compose(
        frame: &PoseFrame,
        offset: &HeadsetOffset,
        planes: ClipPlanes,
        convention: ClipConvention,
    ) -> Self {
        let pose = HeadPose::from_frame(frame).relative_to(offset);
        Self {
            left: EyeView::new(&frame.left_eye, pose.left, planes, convention),
            right: EyeView::new(&frame.right_eye, pose.right, planes, convention),
        }
    }

    /// Distance between the two eye positions.
    pub fn eye_separation(&self) -> f32 {
        self.left.position.distance(self.right.position)
    }
}
