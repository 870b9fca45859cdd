use std::io::{ErrorKind, Write};
use std::time::Duration;

use bytes::BytesMut;
use posebridge_transport::IpcStream;

use crate::codec::{encode_pose_frame, FRAME_SIZE};
use crate::error::{ConnectionError, Result};
use crate::pose::PoseFrame;
use crate::reader::transport_to_connection_error;

/// Writes pose frames to any `Write` stream.
///
/// This is the producer side of the channel. The bridge itself never writes;
/// the writer exists for synthetic producers and tests.
pub struct PoseWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> PoseWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(FRAME_SIZE),
        }
    }

    /// Encode and send one frame (blocking).
    pub fn send(&mut self, frame: &PoseFrame) -> Result<()> {
        self.buf.clear();
        encode_pose_frame(frame, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(ConnectionError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ConnectionError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ConnectionError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl PoseWriter<IpcStream> {
    /// Create a writer for an `IpcStream` whose writes give up after `timeout`.
    pub fn with_write_timeout(inner: IpcStream, timeout: Option<Duration>) -> Result<Self> {
        inner
            .set_write_timeout(timeout)
            .map_err(transport_to_connection_error)?;
        Ok(Self::new(inner))
    }
}
