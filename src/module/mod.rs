//! Modules and the read-only catalog they are resolved against.
//!
//! A catalog is built once from an explicit adjacency structure
//! (`name -> required names`) and never changes afterwards. Resolution
//! lives in [`resolve`], load ordering in [`graph`].

use indexmap::IndexMap;

use crate::error::{LinkError, Result};
use crate::pool::{Content, ResourceKind};

pub mod graph;
pub mod resolve;

pub use graph::DependencyGraph;
pub use resolve::{resolve, resolve_each, ResolvedSet};

#[cfg(test)]
mod tests;

// ─── Module ────────────────────────────────────────────────────────

/// A resource a module contributes to the image, relative to the module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleResource {
    pub path: String,
    pub kind: ResourceKind,
    pub content: Content,
}

/// A named unit with the names it requires and the resources it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    name: String,
    requires: Vec<String>,
    resources: Vec<ModuleResource>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Add required module names. Repeated names are kept once, in first
    /// occurrence order.
    pub fn with_requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.requires.contains(&name) {
                self.requires.push(name);
            }
        }
        self
    }

    pub fn with_resource(
        mut self,
        path: impl Into<String>,
        kind: ResourceKind,
        content: Content,
    ) -> Self {
        self.resources.push(ModuleResource {
            path: path.into(),
            kind,
            content,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    pub fn resources(&self) -> &[ModuleResource] {
        &self.resources
    }
}

// ─── Catalog ───────────────────────────────────────────────────────

/// Read-only lookup table of the modules available for resolution.
#[derive(Clone, Debug, Default)]
pub struct ModuleCatalog {
    /// Sorted by name after construction.
    modules: IndexMap<String, Module>,
}

impl ModuleCatalog {
    /// Build a catalog. Fails on the first name seen twice.
    pub fn new(modules: impl IntoIterator<Item = Module>) -> Result<Self> {
        let mut map: IndexMap<String, Module> = IndexMap::new();
        for module in modules {
            if map.contains_key(module.name()) {
                return Err(LinkError::DuplicateModule {
                    name: module.name().to_string(),
                });
            }
            map.insert(module.name().to_string(), module);
        }
        map.sort_keys();
        tracing::debug!(modules = map.len(), "catalog built");
        Ok(Self { modules: map })
    }

    pub fn lookup(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Every module, ordered by name.
    pub fn all_modules(&self) -> impl ExactSizeIterator<Item = &Module> + '_ {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
