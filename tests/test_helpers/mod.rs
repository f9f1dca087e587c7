//! Shared helpers for integration tests.

use camino::Utf8PathBuf;

/// Returns a fresh, not-yet-created directory path under the system temp dir.
///
/// # Errors
///
/// Returns an error when the temp directory path is not valid UTF-8.
pub fn unique_temp_dir(prefix: &str) -> Result<Utf8PathBuf, eyre::Report> {
    let name = format!("{prefix}_{}", uuid::Uuid::new_v4());
    Utf8PathBuf::from_path_buf(std::env::temp_dir().join(name))
        .map_err(|path| eyre::eyre!("temp dir is not UTF-8: {}", path.display()))
}
