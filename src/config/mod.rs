//! Configuration discovery, parsing and layering.

mod builder;
mod error;
mod load;
mod locate;
mod merge;
mod parse;

pub use builder::{Contour, ContourBuilder, DEFAULT_CONFIG_NAME, DEFAULT_LOCAL_CONFIG_NAME};
pub use error::ConfigError;
pub use load::load;
pub use locate::{candidate_names, find, Locator, EXTENSIONS};
pub use merge::{merge, merge_layers};
pub use parse::{parse, ConfigMapping};
