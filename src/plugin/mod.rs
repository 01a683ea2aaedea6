//! Transform stages.
//!
//! A plugin has a name, accepts its configuration as a string map, and
//! turns one resource pool into a new one. Plugins hold no state besides
//! what `configure` compiled.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LinkError, Result};
use crate::pool::ResourcePool;

pub mod exclude;
pub mod filter;

pub use exclude::ExcludePlugin;
pub use filter::ResourceFilter;


/// Broad role of a plugin, shown in listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Filter,
    Transformer,
    Sorter,
    Compressor,
    Verifier,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Filter => "filter",
            Category::Transformer => "transformer",
            Category::Sorter => "sorter",
            Category::Compressor => "compressor",
            Category::Verifier => "verifier",
        };
        f.write_str(s)
    }
}

pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn category(&self) -> Category {
        Category::Transformer
    }

    /// Help for the option value, if the plugin takes one.
    fn argument_description(&self) -> Option<&str> {
        None
    }

    /// Validate and compile options. The plugin reads the entry keyed by
    /// its own name.
    fn configure(&mut self, options: &BTreeMap<String, String>) -> Result<()>;

    fn transform(&self, pool: &ResourcePool) -> Result<ResourcePool>;
}

impl fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin").field("name", &self.name()).finish()
    }
}

// ─── Registry ──────────────────────────────────────────────────────

type Factory = fn() -> Box<dyn Plugin>;

fn exclude_resources() -> Box<dyn Plugin> {
    Box::new(ExcludePlugin::resources())
}

fn exclude_files() -> Box<dyn Plugin> {
    Box::new(ExcludePlugin::files())
}

/// Built-in plugins by name.
pub struct PluginRegistry {
    factories: BTreeMap<&'static str, Factory>,
}

impl PluginRegistry {
    pub fn builtin() -> Self {
        let mut factories: BTreeMap<&'static str, Factory> = BTreeMap::new();
        factories.insert(exclude::EXCLUDE_RESOURCES, exclude_resources);
        factories.insert(exclude::EXCLUDE_FILES, exclude_files);
        Self { factories }
    }

    /// A fresh, unconfigured instance of the named plugin.
    pub fn create(&self, name: &str) -> Result<Box<dyn Plugin>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| LinkError::UnknownPlugin {
                name: name.to_string(),
            })
    }

    /// Sorted plugin names.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// One unconfigured instance of every plugin, for listings.
    pub fn plugins(&self) -> Vec<Box<dyn Plugin>> {
        self.factories.values().map(|factory| factory()).collect()
    }
}
