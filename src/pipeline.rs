//! Ordered transform stages threaded over a resource pool.
//!
//! Stage `i`'s output is stage `i + 1`'s input. The first failing stage
//! ends the run; its error is returned as is and no later stage runs.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{info, info_span, warn};

use crate::error::Result;
use crate::plugin::{Plugin, PluginRegistry};
use crate::pool::ResourcePool;

/// A stage as written on the command line or in a link file: a plugin
/// name and its raw option string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageSpec {
    pub plugin: String,
    #[serde(default)]
    pub options: Option<String>,
}

impl StageSpec {
    pub fn new(plugin: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            options: Some(options.into()),
        }
    }

    /// Parse `name=options` (or a bare `name`).
    pub fn parse(s: &str) -> Self {
        match s.split_once('=') {
            Some((name, options)) => StageSpec::new(name.trim(), options),
            None => StageSpec {
                plugin: s.trim().to_string(),
                options: None,
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Plugin>>) -> Self {
        Self { stages }
    }

    /// Create and configure built-in plugins from stage specs, in order.
    pub fn configure(registry: &PluginRegistry, specs: &[StageSpec]) -> Result<Self> {
        let mut stages = Vec::with_capacity(specs.len());
        for spec in specs {
            let mut plugin = registry.create(&spec.plugin)?;
            let mut options = BTreeMap::new();
            if let Some(value) = &spec.options {
                options.insert(spec.plugin.clone(), value.clone());
            }
            plugin.configure(&options)?;
            stages.push(plugin);
        }
        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stages.iter().map(|s| s.name())
    }

    pub fn run(&self, pool: &ResourcePool) -> Result<ResourcePool> {
        let mut current = pool.clone();
        for (i, stage) in self.stages.iter().enumerate() {
            let span = info_span!("stage", index = i, plugin = stage.name());
            let _guard = span.enter();
            let before = current.len();
            current = stage.transform(&current).inspect_err(|e| {
                warn!(error = %e, "stage failed");
            })?;
            info!(before, after = current.len(), "stage done");
        }
        Ok(current)
    }
}
