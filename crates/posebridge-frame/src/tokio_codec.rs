use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_pose_frame, encode_pose_frame, FRAME_SIZE};
use crate::error::ConnectionError;
use crate::pose::PoseFrame;

/// `tokio_util` codec for the fixed-size pose record.
///
/// Use with `FramedRead`/`FramedWrite` over any async byte stream. EOF in the
/// middle of a record is reported as [`ConnectionError::Truncated`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseCodec;

impl Decoder for PoseCodec {
    type Item = PoseFrame;
    type Error = ConnectionError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let frame = decode_pose_frame(src);
        if frame.is_none() {
            src.reserve(FRAME_SIZE - src.len());
        }
        Ok(frame)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(ConnectionError::Truncated {
                received: src.len(),
                expected: FRAME_SIZE,
            }),
        }
    }
}

impl Encoder<PoseFrame> for PoseCodec {
    type Error = ConnectionError;

    fn encode(&mut self, item: PoseFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_pose_frame(&item, dst);
        Ok(())
    }
}
