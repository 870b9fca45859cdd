use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::mode::{ServerDir, StartupMode};

/// Interpreter inside a source checkout's virtualenv.
#[cfg(windows)]
pub const VENV_INTERPRETER: &str = "xr-server/env/Scripts/python.exe";
#[cfg(not(windows))]
pub const VENV_INTERPRETER: &str = "xr-server/env/bin/python";

/// Server entry point inside a source checkout.
pub const SERVER_SCRIPT: &str = "xr-server/src/main.py";

/// Where the server lives on disk for each [`StartupMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLayout {
    /// Packaged executable used by [`StartupMode::Inbuilt`].
    pub inbuilt_executable: PathBuf,
    /// Interpreter, relative to an external server directory.
    pub interpreter: PathBuf,
    /// Entry script, relative to an external server directory.
    pub script: PathBuf,
}

impl ServerLayout {
    /// Layout for an application whose data directory is `data_dir`.
    ///
    /// The packaged server sits beside it at `<data_dir>/../xr_server/`.
    pub fn for_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let executable = format!("xr_server{}", std::env::consts::EXE_SUFFIX);
        Self {
            inbuilt_executable: data_dir
                .as_ref()
                .join("..")
                .join("xr_server")
                .join(executable),
            interpreter: PathBuf::from(VENV_INTERPRETER),
            script: PathBuf::from(SERVER_SCRIPT),
        }
    }

    /// Program and arguments to run for `mode`, or `None` when disabled.
    pub fn launch_plan(&self, mode: &StartupMode) -> Option<LaunchPlan> {
        match mode {
            StartupMode::Disabled => None,
            StartupMode::Inbuilt => Some(LaunchPlan {
                program: self.inbuilt_executable.clone(),
                args: Vec::new(),
            }),
            StartupMode::ExternalPath(dir) => Some(self.external_plan(dir)),
        }
    }

    fn external_plan(&self, dir: &ServerDir) -> LaunchPlan {
        let root = dir.as_path();
        LaunchPlan {
            program: root.join(&self.interpreter),
            args: vec![root.join(&self.script).into_os_string()],
        }
    }
}

/// A resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}
