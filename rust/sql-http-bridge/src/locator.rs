//! Finds the sqlcmd executable on the search path.

use crate::error::{Result, ServiceError};
use std::{
    env,
    ffi::{OsStr, OsString},
    path::PathBuf,
};
use tracing::debug;

#[cfg(windows)]
const CANDIDATES: &[&str] = &["sqlcmd.exe", "sqlcmd"];
#[cfg(not(windows))]
const CANDIDATES: &[&str] = &["sqlcmd"];

/// Executable names to try, most specific first.
pub fn candidate_names() -> &'static [&'static str] {
    CANDIDATES
}

/// Returns the first regular file named by `candidates` in any directory of `search_path`.
///
/// Candidates are tried in order, each against every directory, so an earlier candidate
/// anywhere on the path beats a later candidate in an earlier directory.
pub fn locate_in(candidates: &[&str], search_path: &OsStr) -> Option<PathBuf> {
    candidates.iter().find_map(|candidate| {
        env::split_paths(search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(candidate))
            .find(|path| path.is_file())
    })
}

/// Resolves sqlcmd against `search_path`, falling back to the process `PATH`.
pub fn locate_sqlcmd(search_path: Option<&OsStr>) -> Result<PathBuf> {
    let search_path: OsString = match search_path {
        Some(path) => path.to_os_string(),
        None => env::var_os("PATH").unwrap_or_default(),
    };

    locate_in(candidate_names(), &search_path).ok_or_else(|| {
        debug!(candidates = ?candidate_names(), "sqlcmd not found in search path");
        ServiceError::ClientNotFound
    })
}
