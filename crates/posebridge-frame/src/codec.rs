use bytes::{Buf, BufMut, BytesMut};
use glam::{Quat, Vec3};

use crate::convert::convert_eye;
use crate::pose::{EyePose, FovAngles, PoseFrame};

/// One eye: position (12) + orientation (16) + FOV (16) = 44 bytes.
pub const EYE_RECORD_SIZE: usize = 44;

/// One frame: left eye then right eye = 88 bytes.
pub const FRAME_SIZE: usize = 2 * EYE_RECORD_SIZE;

/// Encode a frame into the wire format.
///
/// `frame` is in the consumer's convention; the handedness conversion is
/// applied on the way out so that decoding yields `frame` again.
///
/// Wire format (per eye, repeated left then right):
/// ```text
/// ┌──────────────────┬──────────────────────┬──────────────────────────┐
/// │ Position (12B)   │ Orientation (16B)    │ FOV (16B)                │
/// │ x y z            │ w x y z              │ up down right left       │
/// └──────────────────┴──────────────────────┴──────────────────────────┘
/// ```
pub fn encode_pose_frame(frame: &PoseFrame, dst: &mut BytesMut) {
    dst.reserve(FRAME_SIZE);
    put_eye(dst, &convert_eye(frame.left_eye));
    put_eye(dst, &convert_eye(frame.right_eye));
}

/// Decode one frame from a buffer.
///
/// Returns `None` if fewer than [`FRAME_SIZE`] bytes are buffered. On
/// success, consumes exactly one record from the buffer.
pub fn decode_pose_frame(src: &mut BytesMut) -> Option<PoseFrame> {
    if src.len() < FRAME_SIZE {
        return None;
    }

    let left_eye = convert_eye(get_eye(src));
    let right_eye = convert_eye(get_eye(src));
    Some(PoseFrame {
        left_eye,
        right_eye,
    })
}

fn put_eye(dst: &mut BytesMut, eye: &EyePose) {
    let p = eye.position;
    let q = eye.orientation;
    for v in [p.x, p.y, p.z, q.w, q.x, q.y, q.z] {
        dst.put_f32_le(v);
    }
    for v in eye.fov.to_array() {
        dst.put_f32_le(v);
    }
}

fn get_eye(src: &mut BytesMut) -> EyePose {
    let position = Vec3::new(src.get_f32_le(), src.get_f32_le(), src.get_f32_le());
    let w = src.get_f32_le();
    let orientation = Quat::from_xyzw(src.get_f32_le(), src.get_f32_le(), src.get_f32_le(), w);
    let fov = FovAngles::new(
        src.get_f32_le(),
        src.get_f32_le(),
        src.get_f32_le(),
        src.get_f32_le(),
    );
    EyePose {
        position,
        orientation,
        fov,
    }
}
