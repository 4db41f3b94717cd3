use crate::config::ConfigError;
use crate::module::BadModulePathError;
use thiserror::Error;

/// Top-level error type for the contour library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    BadModulePath(#[from] BadModulePathError),
}
