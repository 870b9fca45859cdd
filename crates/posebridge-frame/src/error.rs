/// Errors that end a pose stream.
///
/// None of these are recoverable for the connection they occur on: the
/// protocol has no resynchronisation marker, so a partial record cannot be
/// skipped.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The producer closed the stream on a record boundary.
    #[error("connection closed")]
    Closed,

    /// The producer closed the stream part-way through a record.
    #[error("connection closed mid-record ({received} of {expected} bytes)")]
    Truncated { received: usize, expected: usize },

    /// An I/O error occurred while reading or writing records.
    #[error("pose stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConnectionError {
    /// True for read timeouts, which only mean "no record yet".
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ConnectionError::Io(err)
                if matches!(err.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut)
        )
    }
}

pub type Result<T> = std::result::Result<T, ConnectionError>;
