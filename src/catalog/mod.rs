//! Read-only catalog of analyzed types.
//!
//! The catalog is produced by an external analyzer and handed to us as JSON.
//! It is never mutated after loading, so a single instance can be shared by
//! any number of concurrent extraction requests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ analyzed.json   │────▶│ Catalog      │────▶│ Extractor     │
//! └─────────────────┘     │ (TypeCatalog)│     │ (per message) │
//!                         └──────────────┘     └───────────────┘
//! ```
//!
//! Components that only query the model depend on the [`TypeCatalog`] trait
//! so tests can supply small synthetic catalogs.

#[cfg(test)]
pub(crate) mod fixtures;
mod model;
pub mod statements;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

pub use model::{
    strip_generics, ArgumentDescription, AttributeDescription, Block, FieldDescription,
    ForEachStatement, IfSection, IfStatement, Invocation, MethodDescription, ParameterDescription,
    PropertyDescription, Statement, SwitchSection, SwitchStatement, TypeDescription, TypeKind,
};

use crate::error::Result;

/// Query interface over an analyzed model.
///
/// # Thread Safety
///
/// Implementations must be immutable for the duration of a request; they are
/// shared across threads when rendering many messages at once.
pub trait TypeCatalog: Send + Sync {
    /// All known types, in catalog order.
    fn types(&self) -> &[TypeDescription];

    /// Look up a type by full name, falling back to the first type with a
    /// matching short name.
    fn lookup(&self, name: &str) -> Option<&TypeDescription>;

    /// Whether `ty` derives from or implements `full_name`, following base
    /// types transitively through the catalog. A type does not implement itself.
    fn implements_type(&self, ty: &TypeDescription, full_name: &str) -> bool {
        self.implements_matching(ty, &|base: &str| base == full_name)
    }

    /// Like [`implements_type`](Self::implements_type) but matches any base type
    /// starting with `prefix` (used for generic families such as `AggregateRoot<`).
    fn implements_type_with_prefix(&self, ty: &TypeDescription, prefix: &str) -> bool {
        self.implements_matching(ty, &|base: &str| base.starts_with(prefix))
    }

    #[doc(hidden)]
    fn implements_matching(&self, ty: &TypeDescription, matches: &dyn Fn(&str) -> bool) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&str> = ty.base_types.iter().map(String::as_str).collect();

        while let Some(base) = pending.pop() {
            if !visited.insert(base) {
                continue;
            }
            if matches(base) {
                return true;
            }
            // Base types are stored with generic arguments; resolve the open type.
            let resolved = self
                .lookup_exact(base)
                .or_else(|| self.lookup_exact(strip_generics(base)));
            if let Some(parent) = resolved {
                pending.extend(parent.base_types.iter().map(String::as_str));
            }
        }

        false
    }

    /// Look up a type by full name only.
    fn lookup_exact(&self, full_name: &str) -> Option<&TypeDescription> {
        self.types().iter().find(|t| t.full_name == full_name)
    }

    /// All types implementing `full_name`, in catalog order.
    fn implementations_of(&self, full_name: &str) -> Vec<&TypeDescription> {
        self.types()
            .iter()
            .filter(|t| self.implements_type(t, full_name))
            .collect()
    }
}

/// In-memory catalog backed by a vector of types with name indexes.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: Vec<TypeDescription>,
    /// Full name -> index of first type with that name.
    by_full_name: HashMap<String, usize>,
    /// Short name -> index of first type with that name.
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(types: Vec<TypeDescription>) -> Self {
        let mut by_full_name = HashMap::new();
        let mut by_name = HashMap::new();
        for (idx, ty) in types.iter().enumerate() {
            by_full_name.entry(ty.full_name.clone()).or_insert(idx);
            by_name.entry(ty.name().to_string()).or_insert(idx);
        }

        Self {
            types,
            by_full_name,
            by_name,
        }
    }

    /// Parse a catalog from the analyzer's JSON output (an array of types).
    pub fn from_json(content: &str) -> Result<Self> {
        let types: Vec<TypeDescription> = serde_json::from_str(content)?;
        Ok(Self::new(types))
    }

    /// Load a catalog from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json(&content)?;
        log::info!(
            "Loaded {} types from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeCatalog for Catalog {
    fn types(&self) -> &[TypeDescription] {
        &self.types
    }

    fn lookup(&self, name: &str) -> Option<&TypeDescription> {
        self.by_full_name
            .get(name)
            .or_else(|| self.by_name.get(name))
            .map(|&idx| &self.types[idx])
    }

    fn lookup_exact(&self, full_name: &str) -> Option<&TypeDescription> {
        self.by_full_name.get(full_name).map(|&idx| &self.types[idx])
    }
}
