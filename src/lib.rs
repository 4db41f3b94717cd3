pub mod config;
mod error;
pub mod module;

pub use config::{
    find, load, merge, parse, ConfigError, ConfigMapping, Contour, ContourBuilder, Locator,
};
pub use error::Error;
pub use module::{resolve, BadModulePathError, ModuleReference, ModuleRegistry, Reason, Unit};
