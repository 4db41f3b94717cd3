use std::path::Path;

use super::ConfigError;

/// Reads the full text of a config file.
///
/// The file is expected to exist; a file that vanished after it was located is
/// reported as [`ConfigError::Io`] like any other read failure.
pub fn load(path: &Path) -> Result<String, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read config file");
    Ok(text)
}
