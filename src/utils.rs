//! Utility functions shared across the engine.

use std::path::PathBuf;

/// Joins a data directory with a file or subdirectory name, returning a
/// platform-independent path string.
///
/// # Panics
///
/// Panics if the resulting path contains invalid UTF-8 characters.
///
/// # Examples
///
/// ```
/// # use upkeep::utils::get_path;
/// let path = get_path("/var/lib/upkeep", "dismissals");
/// assert_eq!(path, "/var/lib/upkeep/dismissals");
/// ```
pub fn get_path(dir_path: &str, subdir_path: &str) -> String {
    let path_buf: PathBuf = [dir_path, subdir_path].iter().collect();
    path_buf.to_str().unwrap().to_owned()
}
