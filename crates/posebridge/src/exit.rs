use std::fmt;
use std::io;

use posebridge_frame::ConnectionError;
use posebridge_listener::ListenerError;
use posebridge_supervisor::ConfigError;
use posebridge_transport::TransportError;

// Process exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

// Server startup configuration. Kept distinct so launchers can tell the
// two failures apart.
pub const STARTUP_MISSING_VALUE: i32 = 141;
pub const STARTUP_INVALID_PATH: i32 = 142;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Bind { source, .. }
        | TransportError::Connect { source, .. }
        | TransportError::Accept(source)
        | TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn connection_error(context: &str, err: ConnectionError) -> CliError {
    match err {
        ConnectionError::Io(source) => io_error(context, source),
        other => CliError::new(FAILURE, format!("{context}: {other}")),
    }
}

pub fn listener_error(context: &str, err: ListenerError) -> CliError {
    match err {
        ListenerError::Transport(err) => transport_error(context, err),
        ListenerError::Spawn(source) => io_error(context, source),
    }
}

pub fn config_error(argument: &str, err: ConfigError) -> CliError {
    let code = match err {
        ConfigError::MissingValue => STARTUP_MISSING_VALUE,
        ConfigError::InvalidPath { .. } => STARTUP_INVALID_PATH,
    };
    CliError::new(code, format!("{argument}: {err}"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn startup_errors_have_distinct_codes() {
        let missing = config_error("--server-startup", ConfigError::MissingValue);
        assert_eq!(missing.code, STARTUP_MISSING_VALUE);
        assert!(missing.message.starts_with("--server-startup: "));

        let invalid = config_error(
            "--server-startup",
            ConfigError::InvalidPath {
                path: PathBuf::from("/no/such/dir"),
            },
        );
        assert_eq!(invalid.code, STARTUP_INVALID_PATH);
        assert!(invalid.message.contains("/no/such/dir"));
    }

    #[test]
    fn connect_refused_maps_to_failure() {
        let err = transport_error(
            "connect failed",
            TransportError::Connect {
                path: PathBuf::from("/tmp/x.sock"),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            },
        );
        assert_eq!(err.code, FAILURE);
    }

    #[test]
    fn unsupported_platform_is_transport_error() {
        let err = transport_error("bind failed", TransportError::Unsupported("windows"));
        assert_eq!(err.code, TRANSPORT_ERROR);
    }
}
