//! Resolution of dotted names to registered code units.
//!
//! Configuration values can name extension points such as `"app.hooks.on_start"`.
//! A [`ModuleRegistry`] maps those names to units registered by the application,
//! and [`resolve`] turns a name into a [`ModuleReference`].

mod registry;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub use registry::{Handle, ModuleRegistry, Unit};

/// Why a dotted name could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Reason {
    /// Empty name, or a name with an empty segment (`"a..b"`, `".a"`).
    Malformed,
    UnitNotFound,
    AttributeNotFound,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Malformed => "malformed dotted name",
            Self::UnitNotFound => "no such unit",
            Self::AttributeNotFound => "unit has no such attribute",
        })
    }
}

#[derive(Debug, Error)]
#[error("cannot resolve module path '{name}': {reason}")]
pub struct BadModulePathError {
    name: String,
    reason: Reason,
}

impl BadModulePathError {
    pub(crate) fn new(name: &str, reason: Reason) -> Self {
        Self {
            name: name.to_string(),
            reason,
        }
    }

    /// The dotted name that failed to resolve.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Why resolution failed.
    pub fn reason(&self) -> Reason {
        self.reason
    }
}

#[derive(Clone)]
enum Target {
    Unit(Arc<Unit>),
    Attribute { unit: Arc<Unit>, value: Handle },
}

/// A resolved unit or unit attribute.
///
/// Two references are equal when they point at the same instance.
#[derive(Clone)]
pub struct ModuleReference {
    name: String,
    target: Target,
}

impl ModuleReference {
    fn for_unit(name: &str, unit: Arc<Unit>) -> Self {
        Self {
            name: name.to_string(),
            target: Target::Unit(unit),
        }
    }

    fn for_attribute(name: &str, unit: Arc<Unit>, value: Handle) -> Self {
        Self {
            name: name.to_string(),
            target: Target::Attribute { unit, value },
        }
    }

    /// The dotted name this reference was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit itself, or the unit that owns the attribute.
    pub fn unit(&self) -> &Arc<Unit> {
        match &self.target {
            Target::Unit(unit) | Target::Attribute { unit, .. } => unit,
        }
    }

    /// Returns `true` if this reference names a whole unit.
    pub fn is_unit(&self) -> bool {
        matches!(self.target, Target::Unit(_))
    }

    /// The attribute value, when this reference names an attribute.
    pub fn value(&self) -> Option<&Handle> {
        match &self.target {
            Target::Unit(_) => None,
            Target::Attribute { value, .. } => Some(value),
        }
    }

    /// Returns the attribute value if it holds a `T`. Always `None` for units.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value()?.downcast_ref()
    }
}

impl PartialEq for ModuleReference {
    fn eq(&self, other: &Self) -> bool {
        match (&self.target, &other.target) {
            (Target::Unit(a), Target::Unit(b)) => Arc::ptr_eq(a, b),
            (Target::Attribute { value: a, .. }, Target::Attribute { value: b, .. }) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl PartialEq<Arc<Unit>> for ModuleReference {
    fn eq(&self, other: &Arc<Unit>) -> bool {
        matches!(&self.target, Target::Unit(unit) if Arc::ptr_eq(unit, other))
    }
}

impl fmt::Debug for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleReference")
            .field("name", &self.name)
            .field("kind", &if self.is_unit() { "unit" } else { "attribute" })
            .finish()
    }
}

/// Resolves `dotted_name` against `registry`. See [`ModuleRegistry::resolve`].
pub fn resolve(
    registry: &ModuleRegistry,
    dotted_name: &str,
) -> Result<ModuleReference, BadModulePathError> {
    registry.resolve(dotted_name)
}
