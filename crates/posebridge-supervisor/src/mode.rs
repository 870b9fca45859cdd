use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

/// A directory that existed when it was validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDir(PathBuf);

impl ServerDir {
    /// Accept `path` only if it names an existing directory.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.is_dir() {
            Ok(Self(path))
        } else {
            Err(ConfigError::InvalidPath { path })
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ServerDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Whether and how the XR server is launched alongside the listener.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StartupMode {
    /// Never launch anything; the producer is started some other way.
    Disabled,
    /// Launch the packaged server executable next to the data directory.
    #[default]
    Inbuilt,
    /// Launch the server from a source checkout through its virtualenv.
    ExternalPath(ServerDir),
}

impl StartupMode {
    /// Parse a startup argument.
    ///
    /// `"None"` and `"Disabled"` disable launching, `"Inbuilt"` selects the
    /// packaged server, and anything else must be an existing directory.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "" => Err(ConfigError::MissingValue),
            "None" | "Disabled" => Ok(StartupMode::Disabled),
            "Inbuilt" => Ok(StartupMode::Inbuilt),
            path => ServerDir::new(path).map(StartupMode::ExternalPath),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, StartupMode::Disabled)
    }
}

impl FromStr for StartupMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StartupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupMode::Disabled => f.write_str("None"),
            StartupMode::Inbuilt => f.write_str("Inbuilt"),
            StartupMode::ExternalPath(dir) => write!(f, "{}", dir.as_path().display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_modes() {
        assert_eq!(StartupMode::parse("None").unwrap(), StartupMode::Disabled);
        assert_eq!(StartupMode::parse("Disabled").unwrap(), StartupMode::Disabled);
        assert_eq!(StartupMode::parse("Inbuilt").unwrap(), StartupMode::Inbuilt);
        assert_eq!(StartupMode::default(), StartupMode::Inbuilt);
        assert!(StartupMode::Disabled.is_disabled());
        assert!(!StartupMode::Inbuilt.is_disabled());
    }

    #[test]
    fn names_are_case_sensitive() {
        // "none" is not a mode, so it is treated as a (missing) path.
        let err = StartupMode::parse("none").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPath { .. }));
    }

    #[test]
    fn empty_value_is_missing() {
        assert!(matches!(
            StartupMode::parse("").unwrap_err(),
            ConfigError::MissingValue
        ));
    }

    #[test]
    fn existing_directory_is_external_path() {
        let dir = std::env::temp_dir();
        let mode: StartupMode = dir.to_str().unwrap().parse().unwrap();
        match mode {
            StartupMode::ExternalPath(server) => assert_eq!(server.as_path(), dir),
            other => panic!("expected external path, got {other:?}"),
        }
    }

    #[test]
    fn missing_or_non_directory_path_is_rejected() {
        let missing = std::env::temp_dir().join(format!("posebridge-no-such-{}", std::process::id()));
        let err = StartupMode::parse(missing.to_str().unwrap()).unwrap_err();
        match err {
            ConfigError::InvalidPath { path } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }

        let file = std::env::temp_dir().join(format!("posebridge-mode-file-{}", std::process::id()));
        std::fs::write(&file, b"").unwrap();
        assert!(ServerDir::new(&file).is_err());
        let _ = std::fs::remove_file(&file);
    }

    #[test]
    fn display_round_trips_named_modes() {
        assert_eq!(StartupMode::Disabled.to_string(), "None");
        assert_eq!(StartupMode::Inbuilt.to_string(), "Inbuilt");
    }
}
