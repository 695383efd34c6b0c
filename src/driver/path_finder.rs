//! Control tool lookup on PATH with install-directory fallbacks.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Vendor directories under Program Files holding versioned tool folders.
const VENDOR_DIRS: &[&str] = &["Dokan"];

/// Find a driver control tool by name.
///
/// Tries the system PATH via the `which` crate first. The Dokan installer
/// does not always add itself to PATH, so this then checks every versioned
/// folder under `%ProgramFiles%\Dokan`, preferring the last one in name
/// order (the newest library).
pub(crate) fn find_executable(name: &str) -> Option<PathBuf> {
    if let Ok(path) = which::which(name) {
        return Some(path);
    }

    let program_files = env::var_os("ProgramFiles").map(PathBuf::from)?;
    VENDOR_DIRS
        .iter()
        .find_map(|vendor| find_in_versioned_dirs(&program_files.join(vendor), name))
}

/// Newest `<base>/<version dir>/<name>` that exists.
pub(crate) fn find_in_versioned_dirs(base: &Path, name: &str) -> Option<PathBuf> {
    let file_name = format!("{}{}", name, env::consts::EXE_SUFFIX);
    let mut dirs: Vec<PathBuf> = fs::read_dir(base)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    dirs.into_iter()
        .rev()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}
