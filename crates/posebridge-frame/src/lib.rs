//! Fixed-layout pose/FOV record codec.
//!
//! The producer streams one 88-byte record per tracking sample, with no
//! header, length prefix or checksum:
//! - left eye, then right eye, 44 bytes each
//! - per eye: position (3 × f32), orientation (4 × f32, w first), FOV (4 × f32)
//! - all values little-endian IEEE-754
//!
//! Decoding converts the producer's right-handed convention into the
//! consumer's left-handed one (see [`convert`]).

pub mod codec;
pub mod convert;
pub mod error;
pub mod pose;
pub mod reader;
#[cfg(feature = "async")]
pub mod tokio_codec;
pub mod writer;

pub use codec::{decode_pose_frame, encode_pose_frame, EYE_RECORD_SIZE, FRAME_SIZE};
pub use error::{ConnectionError, Result};
pub use pose::{EyePose, FovAngles, PoseFrame};
pub use reader::PoseReader;
#[cfg(feature = "async")]
pub use tokio_codec::PoseCodec;
pub use writer::PoseWriter;
