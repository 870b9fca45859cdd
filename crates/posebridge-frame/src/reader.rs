use std::io::{ErrorKind, Read};
use std::time::Duration;

use bytes::BytesMut;
use posebridge_transport::IpcStream;

use crate::codec::{decode_pose_frame, FRAME_SIZE};
use crate::error::{ConnectionError, Result};
use crate::pose::PoseFrame;

const INITIAL_BUFFER_CAPACITY: usize = 4 * FRAME_SIZE;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads complete pose frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames.
/// Bytes of a partially received record survive a timed-out read, so a
/// caller may retry after checking for shutdown.
pub struct PoseReader<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Read> PoseReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(ConnectionError::Closed)` on EOF at a record boundary and
    /// `Err(ConnectionError::Truncated { .. })` on EOF inside a record.
    /// `WouldBlock`/`TimedOut` are returned as [`ConnectionError::Io`]; see
    /// [`ConnectionError::is_timeout`].
    pub fn read_pose_frame(&mut self) -> Result<PoseFrame> {
        loop {
            if let Some(frame) = decode_pose_frame(&mut self.buf) {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ConnectionError::Io(err)),
            };

            if read == 0 {
                return Err(if self.buf.is_empty() {
                    ConnectionError::Closed
                } else {
                    ConnectionError::Truncated {
                        received: self.buf.len(),
                        expected: FRAME_SIZE,
                    }
                });
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Number of bytes buffered towards the next record.
    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl PoseReader<IpcStream> {
    /// Create a reader for an `IpcStream` whose reads give up after `timeout`.
    pub fn with_read_timeout(inner: IpcStream, timeout: Option<Duration>) -> Result<Self> {
        inner
            .set_read_timeout(timeout)
            .map_err(transport_to_connection_error)?;
        Ok(Self::new(inner))
    }
}

pub(crate) fn transport_to_connection_error(
    err: posebridge_transport::TransportError,
) -> ConnectionError {
    match err {
        posebridge_transport::TransportError::Io(io)
        | posebridge_transport::TransportError::Accept(io) => ConnectionError::Io(io),
        posebridge_transport::TransportError::Bind { source, .. }
        | posebridge_transport::TransportError::Connect { source, .. } => {
            ConnectionError::Io(source)
        }
        other => ConnectionError::Io(std::io::Error::other(other.to_string())),
    }
}
