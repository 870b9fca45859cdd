//! Supervision of the external XR server that produces pose frames.
//!
//! [`StartupMode`] decides whether the server is launched and from where;
//! [`ServerLayout`] maps a mode to a command line; [`ServerRunner`] owns the
//! resulting child process, forwards its output to the log and notices when
//! it exits.

pub mod error;
pub mod layout;
pub mod mode;
pub mod runner;

pub use error::{ConfigError, ProcessControlError, ProcessExitError, Result};
pub use layout::{LaunchPlan, ServerLayout, SERVER_SCRIPT, VENV_INTERPRETER};
pub use mode::{ServerDir, StartupMode};
pub use runner::{RunnerConfig, RunnerState, ServerRunner, OUTPUT_TAG};
