use std::path::PathBuf;
use std::process::ExitStatus;

/// Invalid server startup configuration.
///
/// Raised while parsing a [`StartupMode`](crate::StartupMode), before any
/// process is launched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The startup argument was given without a value.
    #[error("expected a server startup mode, found nothing")]
    MissingValue,

    /// The value was neither a known mode nor an existing directory.
    #[error(
        "expected \"None\", \"Inbuilt\" or a path to an existing xr server directory, found {}",
        path.display()
    )]
    InvalidPath { path: PathBuf },
}

/// A start/stop request that could not be carried out.
///
/// None of these are fatal: the runner logs them and stays in its current
/// state.
#[derive(Debug, thiserror::Error)]
pub enum ProcessControlError {
    #[error("server process is already running (pid {pid})")]
    AlreadyRunning { pid: u32 },

    #[error("no server process is running")]
    NotRunning,

    #[error("failed to launch {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to kill server process (pid {pid}): {source}")]
    Kill {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}

/// The server process exited without being asked to.
#[derive(Debug, Clone, thiserror::Error)]
#[error("server process (pid {pid}) exited unexpectedly: {status}")]
pub struct ProcessExitError {
    pub pid: u32,
    pub status: ExitStatus,
}

pub type Result<T> = std::result::Result<T, ProcessControlError>;
