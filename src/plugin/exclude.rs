use std::collections::BTreeMap;

use tracing::debug;

use super::{Category, Plugin, ResourceFilter};
use crate::error::{LinkError, Result};
use crate::pool::{ResourceKind, ResourcePool};

pub const EXCLUDE_RESOURCES: &str = "exclude-resources";
pub const EXCLUDE_FILES: &str = "exclude-files";

/// Which entries a matching pattern may drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    /// Only `class-or-resource` entries.
    Resources,
    /// Every kind except `class-or-resource`.
    Files,
}

/// Drops entries whose path matches the configured patterns.
///
/// `exclude-resources` only considers class-or-resource entries;
/// `exclude-files` only the other kinds (configs, native libraries, ...).
#[derive(Clone, Debug)]
pub struct ExcludePlugin {
    scope: Scope,
    filter: Option<ResourceFilter>,
}

impl ExcludePlugin {
    pub fn resources() -> Self {
        Self {
            scope: Scope::Resources,
            filter: None,
        }
    }

    pub fn files() -> Self {
        Self {
            scope: Scope::Files,
            filter: None,
        }
    }

    /// Shorthand for `configure` with a single option.
    pub fn with_patterns(mut self, spec: &str) -> Result<Self> {
        self.filter = Some(ResourceFilter::compile(spec)?);
        Ok(self)
    }

    fn in_scope(&self, kind: ResourceKind) -> bool {
        match self.scope {
            Scope::Resources => kind == ResourceKind::ClassOrResource,
            Scope::Files => kind != ResourceKind::ClassOrResource,
        }
    }
}

impl Plugin for ExcludePlugin {
    fn name(&self) -> &str {
        match self.scope {
            Scope::Resources => EXCLUDE_RESOURCES,
            Scope::Files => EXCLUDE_FILES,
        }
    }

    fn description(&self) -> &str {
        match self.scope {
            Scope::Resources => "Exclude class files and resources matching the patterns",
            Scope::Files => "Exclude configuration, native and other files matching the patterns",
        }
    }

    fn category(&self) -> Category {
        Category::Filter
    }

    fn argument_description(&self) -> Option<&str> {
        Some("<pattern-list> comma-separated globs, `glob:`/`regex:` prefixed patterns, or @<file>")
    }

    fn configure(&mut self, options: &BTreeMap<String, String>) -> Result<()> {
        let spec = options
            .get(self.name())
            .ok_or_else(|| LinkError::MissingArgument {
                plugin: self.name().to_string(),
            })?;
        let filter = ResourceFilter::compile(spec)?;
        debug!(plugin = self.name(), patterns = filter.pattern_count(), "configured");
        self.filter = Some(filter);
        Ok(())
    }

    fn transform(&self, pool: &ResourcePool) -> Result<ResourcePool> {
        let filter = self.filter.as_ref().ok_or_else(|| LinkError::NotConfigured {
            plugin: self.name().to_string(),
        })?;
        pool.builder_with_transform(|entry| {
            if self.in_scope(entry.kind()) && filter.matches(entry.path()) {
                debug!(plugin = self.name(), path = entry.path(), "excluded");
                None
            } else {
                Some(entry.clone())
            }
        })
    }
}
