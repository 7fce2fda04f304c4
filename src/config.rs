//! Configuration constants and utilities for curlline
//!
//! Resolves the directory where session state is stored.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default storage directory on non-Windows hosts
pub const DEFAULT_STORE_DIR: &str = "~/.config/curlline";

/// Environment variable name for overriding the storage directory
pub const STORE_DIR_ENV_VAR: &str = "CURLLINE_HOME";

/// Sub-directory created under `%APPDATA%` on Windows
const APPDATA_SUBDIR: &str = "curlline";

/// Get the storage directory: explicit flag first, then the environment
/// variable, then the platform default
pub fn resolve_store_dir(explicit: Option<&Path>) -> PathBuf {
    resolve_store_dir_from(explicit, std::env::var_os(STORE_DIR_ENV_VAR))
}

fn resolve_store_dir_from(explicit: Option<&Path>, env_value: Option<OsString>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir.as_os_str());
    }
    if let Some(dir) = env_value.filter(|value| !value.is_empty()) {
        return expand_home(&dir);
    }
    default_store_dir()
}

fn default_store_dir() -> PathBuf {
    if cfg!(windows) {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join(APPDATA_SUBDIR);
        }
    }
    PathBuf::from(shellexpand::tilde(DEFAULT_STORE_DIR).as_ref())
}

/// Expand a leading `~`; non UTF-8 paths are used as given
fn expand_home(path: &std::ffi::OsStr) -> PathBuf {
    match path.to_str() {
        Some(text) => PathBuf::from(shellexpand::tilde(text).as_ref()),
        None => PathBuf::from(path),
    }
}
