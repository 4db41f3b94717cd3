use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid configuration format{}: {reason}", describe_path(.path.as_deref()))]
    InvalidFormat {
        path: Option<PathBuf>,
        reason: String,
    },

    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub(crate) fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Attaches the file an `InvalidFormat` error came from. Other kinds are returned unchanged.
    pub(crate) fn at_path(self, file: &Path) -> Self {
        match self {
            Self::InvalidFormat { path: None, reason } => Self::InvalidFormat {
                path: Some(file.to_path_buf()),
                reason,
            },
            other => other,
        }
    }
}

fn describe_path(path: Option<&Path>) -> String {
    path.map(|p| format!(" in '{}'", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_display_without_path() {
        let err = ConfigError::invalid_format("top level is a string");
        assert_eq!(
            err.to_string(),
            "invalid configuration format: top level is a string"
        );
    }

    #[test]
    fn test_at_path_attaches_file() {
        let err = ConfigError::invalid_format("broken").at_path(Path::new("conf/config.yaml"));
        assert_eq!(
            err.to_string(),
            "invalid configuration format in 'conf/config.yaml': broken"
        );
    }

    #[test]
    fn test_at_path_keeps_io_errors() {
        let err = ConfigError::io(
            "a.yaml",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        )
        .at_path(Path::new("b.yaml"));
        assert!(matches!(err, ConfigError::Io { ref path, .. } if path == Path::new("a.yaml")));
    }
}
