use std::path::PathBuf;

/// Fixed name the producer connects to.
pub const DEFAULT_ENDPOINT_NAME: &str = "xr_headset_data";

/// Resolve the default endpoint path.
///
/// Uses `$XDG_RUNTIME_DIR` when set and non-empty, otherwise the system temp
/// directory. The socket file is `<dir>/xr_headset_data.sock`.
pub fn default_endpoint_path() -> PathBuf {
    let dir = std::env::var_os("XDG_RUNTIME_DIR")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    dir.join(format!("{DEFAULT_ENDPOINT_NAME}.sock"))
}
