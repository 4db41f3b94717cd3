use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::{BadModulePathError, ModuleReference, Reason};

/// A shared, type-erased attribute value.
pub type Handle = Arc<dyn Any + Send + Sync>;

type Init = Box<dyn Fn() -> Unit + Send + Sync>;

/// A loadable code unit: a named bag of typed attributes.
#[derive(Default)]
pub struct Unit {
    attributes: BTreeMap<String, Handle>,
}

impl Unit {
    /// Creates a unit with no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute, replacing any previous one with the same name.
    #[must_use]
    pub fn with_attribute<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.attributes.insert(name.into(), Arc::new(value));
        self
    }

    /// Returns the attribute `name` as a type-erased handle.
    pub fn attribute(&self, name: &str) -> Option<&Handle> {
        self.attributes.get(name)
    }

    /// Returns the attribute `name` if it holds a `T`.
    pub fn attribute_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.attributes.get(name)?.downcast_ref()
    }

    /// Iterates over attribute names in sorted order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .finish()
    }
}

struct Entry {
    /// `None` for units registered already built.
    init: Option<Init>,
    unit: OnceLock<Arc<Unit>>,
}

impl Entry {
    /// Runs the initializer on first use only, even under concurrent callers.
    fn unit(&self) -> Arc<Unit> {
        Arc::clone(self.unit.get_or_init(|| {
            Arc::new(self.init.as_ref().map(|init| init()).unwrap_or_default())
        }))
    }
}

/// Maps dotted names to lazily initialized [`Unit`]s.
///
/// Units are registered up front and built the first time they are loaded or
/// resolved. Every later lookup returns the same shared instance.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: BTreeMap<String, Entry>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `init` under the dotted `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: impl Into<String>, init: F) -> &mut Self
    where
        F: Fn() -> Unit + Send + Sync + 'static,
    {
        self.entries.insert(
            name.into(),
            Entry {
                init: Some(Box::new(init)),
                unit: OnceLock::new(),
            },
        );
        self
    }

    /// Registers an already built unit.
    pub fn register_unit(&mut self, name: impl Into<String>, unit: Unit) -> &mut Self {
        self.entries.insert(
            name.into(),
            Entry {
                init: None,
                unit: OnceLock::from(Arc::new(unit)),
            },
        );
        self
    }

    /// Returns `true` if a unit is registered under exactly `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates over registered unit names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Loads the unit registered under exactly `name`, initializing it if needed.
    pub fn load(&self, name: &str) -> Option<Arc<Unit>> {
        self.entries.get(name).map(Entry::unit)
    }

    /// Resolves `dotted_name` to a unit, or to an attribute of a unit.
    ///
    /// The whole name is tried as a unit first. Failing that, everything before the
    /// last `.` must name a unit that has the final segment as an attribute.
    pub fn resolve(&self, dotted_name: &str) -> Result<ModuleReference, BadModulePathError> {
        if dotted_name.is_empty() || dotted_name.split('.').any(str::is_empty) {
            return Err(BadModulePathError::new(dotted_name, Reason::Malformed));
        }

        if let Some(unit) = self.load(dotted_name) {
            tracing::debug!(name = dotted_name, "resolved unit");
            return Ok(ModuleReference::for_unit(dotted_name, unit));
        }

        let Some((unit_name, attribute)) = dotted_name.rsplit_once('.') else {
            return Err(BadModulePathError::new(dotted_name, Reason::UnitNotFound));
        };

        let unit = self
            .load(unit_name)
            .ok_or_else(|| BadModulePathError::new(dotted_name, Reason::UnitNotFound))?;
        let value = unit
            .attribute(attribute)
            .map(Arc::clone)
            .ok_or_else(|| BadModulePathError::new(dotted_name, Reason::AttributeNotFound))?;

        tracing::debug!(unit = unit_name, attribute, "resolved attribute");
        Ok(ModuleReference::for_attribute(dotted_name, unit, value))
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("units", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
