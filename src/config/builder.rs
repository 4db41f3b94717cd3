use std::collections::{btree_map, HashMap};
use std::ops::Index;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use super::locate::Locator;
use super::{load, merge, parse, ConfigError, ConfigMapping};

/// Base name of the standard config file when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "config";

/// Conventional base name of the local override file.
pub const DEFAULT_LOCAL_CONFIG_NAME: &str = "config_local";

/// A loaded configuration: defaults, overridden by the standard file, overridden
/// by the local file.
///
/// Behaves as a read-only string-keyed mapping and compares equal to a plain
/// [`ConfigMapping`] with the same contents.
///
/// ## Example
///
/// ```no_run
/// use contour::{ConfigMapping, Contour};
///
/// let defaults: ConfigMapping = [("session".to_string(), "dev".into())].into_iter().collect();
///
/// let config = Contour::builder()
///     .config_name("app")
///     .local_config_name("app_local")
///     .defaults(defaults)
///     .build()?;
///
/// let session = config.get("session").and_then(|v| v.as_str());
/// # Ok::<(), contour::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Contour {
    values: ConfigMapping,
    paths: Vec<PathBuf>,
}

impl Contour {
    /// Creates a new builder.
    pub fn builder() -> ContourBuilder {
        ContourBuilder::default()
    }

    /// Loads `config_name` (or [`DEFAULT_CONFIG_NAME`]) and, when given,
    /// `local_config_name` over `defaults`, searching the default [`Locator`] roots.
    pub fn create(
        config_name: Option<&str>,
        local_config_name: Option<&str>,
        defaults: Option<ConfigMapping>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Some(name) = config_name {
            builder = builder.config_name(name);
        }
        if let Some(name) = local_config_name {
            builder = builder.local_config_name(name);
        }
        if let Some(defaults) = defaults {
            builder = builder.defaults(defaults);
        }
        builder.build()
    }

    /// Returns the value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no layer contributed any key.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over key/value pairs in sorted key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.values.iter()
    }

    /// Returns the merged mapping.
    pub fn as_mapping(&self) -> &ConfigMapping {
        &self.values
    }

    /// Consumes the configuration, returning the merged mapping.
    pub fn into_mapping(self) -> ConfigMapping {
        self.values
    }

    /// Files that contributed to this configuration, standard file first.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Converts the value under `key` into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.values
            .get(key)
            .map(|value| serde_yaml::from_value(value.clone()))
            .transpose()
            .map_err(ConfigError::Deserialize)
    }

    /// Converts the whole configuration into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let mapping = self
            .values
            .iter()
            .map(|(k, v)| (Value::String(k.clone()), v.clone()))
            .collect();
        serde_yaml::from_value(Value::Mapping(mapping)).map_err(ConfigError::Deserialize)
    }
}

impl Index<&str> for Contour {
    type Output = Value;

    /// Panics when `key` is absent, like indexing a map.
    fn index(&self, key: &str) -> &Value {
        &self.values[key]
    }
}

impl<'a> IntoIterator for &'a Contour {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl From<ConfigMapping> for Contour {
    fn from(values: ConfigMapping) -> Self {
        Self {
            values,
            paths: Vec::new(),
        }
    }
}

impl PartialEq for Contour {
    /// Compares contents only; where the values came from does not matter.
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl PartialEq<ConfigMapping> for Contour {
    fn eq(&self, other: &ConfigMapping) -> bool {
        &self.values == other
    }
}

impl PartialEq<Contour> for ConfigMapping {
    fn eq(&self, other: &Contour) -> bool {
        self == &other.values
    }
}

impl<S: std::hash::BuildHasher> PartialEq<HashMap<String, Value, S>> for Contour {
    fn eq(&self, other: &HashMap<String, Value, S>) -> bool {
        self.values.len() == other.len()
            && self
                .values
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

/// Builder for [`Contour`].
///
/// Nothing touches the filesystem until [`build`](Self::build) is called.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ContourBuilder {
    config_name: String,
    local_config_name: Option<String>,
    defaults: ConfigMapping,
    locator: Locator,
}

impl Default for ContourBuilder {
    fn default() -> Self {
        Self {
            config_name: DEFAULT_CONFIG_NAME.to_string(),
            local_config_name: None,
            defaults: ConfigMapping::new(),
            locator: Locator::default(),
        }
    }
}

impl ContourBuilder {
    /// Name or path of the standard config file. The extension is optional.
    pub fn config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = name.into();
        self
    }

    /// Name or path of the local override file. Without one, no local layer is loaded.
    pub fn local_config_name(mut self, name: impl Into<String>) -> Self {
        self.local_config_name = Some(name.into());
        self
    }

    /// Lowest-precedence values, overridden by anything found on disk.
    pub fn defaults(mut self, defaults: ConfigMapping) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replaces the locator used to find both files.
    pub fn locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    /// Searches only `dir` for both files.
    pub fn search_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.locator(Locator::new([dir.into()]))
    }

    /// Locates, reads and parses each file, then merges them over the defaults.
    ///
    /// Missing files are skipped. A file that exists but cannot be read or parsed
    /// fails the whole build.
    pub fn build(self) -> Result<Contour, ConfigError> {
        let mut paths = Vec::new();

        let standard = load_layer(&self.locator, &self.config_name)?.map(|(path, table)| {
            paths.push(path);
            table
        });

        let local = match &self.local_config_name {
            Some(name) => load_layer(&self.locator, name)?.map(|(path, table)| {
                paths.push(path);
                table
            }),
            None => None,
        };

        let values = merge(Some(self.defaults), standard, local);
        tracing::debug!(keys = values.len(), files = paths.len(), "configuration loaded");

        Ok(Contour { values, paths })
    }
}

fn load_layer(
    locator: &Locator,
    name: &str,
) -> Result<Option<(PathBuf, ConfigMapping)>, ConfigError> {
    let Some(path) = locator.find(name)? else {
        return Ok(None);
    };
    let table = read_layer(&path)?;
    tracing::debug!(path = %path.display(), keys = table.len(), "loaded config layer");
    Ok(Some((path, table)))
}

fn read_layer(path: &Path) -> Result<ConfigMapping, ConfigError> {
    let text = load(path)?;
    parse(&text).map_err(|e| e.at_path(path))
}
