use std::collections::{BTreeMap, VecDeque};

use rayon::prelude::*;
use tracing::{debug, info};

use super::{DependencyGraph, Module, ModuleCatalog};
use crate::error::{LinkError, Result};

/// The transitive closure of a set of roots.
///
/// Every requirement of every member is itself a member, and every member
/// is reachable from some root.
#[derive(Clone, Debug)]
pub struct ResolvedSet<'c> {
    roots: Vec<&'c str>,
    modules: BTreeMap<&'c str, &'c Module>,
}

impl<'c> ResolvedSet<'c> {
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&'c Module> {
        self.modules.get(name).copied()
    }

    /// Member names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'c str> + '_ {
        self.modules.keys().copied()
    }

    /// Member modules ordered by name.
    pub fn modules(&self) -> impl Iterator<Item = &'c Module> + '_ {
        self.modules.values().copied()
    }

    /// The roots, in the order they were requested (deduplicated).
    pub fn roots(&self) -> &[&'c str] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn graph(&self) -> DependencyGraph<'c> {
        DependencyGraph::new(self)
    }
}

/// Compute the closure of `roots` over the catalog's "requires" edges.
///
/// All roots are checked before traversal starts, so a missing root is
/// reported even when another root would fail later. Cycles are allowed:
/// a module already in the closure is never expanded twice.
pub fn resolve<'c, I, S>(catalog: &'c ModuleCatalog, roots: I) -> Result<ResolvedSet<'c>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root_modules: Vec<&'c Module> = Vec::new();
    for name in roots {
        let name = name.as_ref();
        let module = catalog
            .lookup(name)
            .ok_or_else(|| LinkError::UnresolvedRoot {
                name: name.to_string(),
            })?;
        if !root_modules.iter().any(|m| m.name() == module.name()) {
            root_modules.push(module);
        }
    }

    let mut visited: BTreeMap<&'c str, &'c Module> = BTreeMap::new();
    let mut queue: VecDeque<&'c Module> = VecDeque::new();
    for &module in &root_modules {
        visited.insert(module.name(), module);
        queue.push_back(module);
    }

    while let Some(module) = queue.pop_front() {
        debug!(module = module.name(), requires = module.requires().len(), "expanding");
        for required in module.requires() {
            let dep = catalog
                .lookup(required)
                .ok_or_else(|| LinkError::UnresolvedDependency {
                    module: module.name().to_string(),
                    missing: required.clone(),
                })?;
            if !visited.contains_key(dep.name()) {
                visited.insert(dep.name(), dep);
                queue.push_back(dep);
            }
        }
    }

    info!(
        roots = root_modules.len(),
        modules = visited.len(),
        "resolved module closure"
    );

    Ok(ResolvedSet {
        roots: root_modules.iter().map(|m| m.name()).collect(),
        modules: visited,
    })
}

/// Resolve independent root sets against one catalog in parallel.
/// Results come back in input order.
pub fn resolve_each<'c, S>(
    catalog: &'c ModuleCatalog,
    root_sets: &[Vec<S>],
) -> Vec<Result<ResolvedSet<'c>>>
where
    S: AsRef<str> + Sync,
{
    root_sets
        .par_iter()
        .map(|roots| resolve(catalog, roots.iter()))
        .collect()
}
