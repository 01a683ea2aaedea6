//! Immutable, path-keyed collections of resource entries.
//!
//! A pool is only ever built through [`ResourcePoolBuilder`] or derived
//! from another pool with [`ResourcePool::builder_with_transform`]; both
//! refuse two entries with the same path. Insertion order is kept.

use indexmap::IndexMap;

use crate::error::{LinkError, Result};
use crate::module::ResolvedSet;

mod entry;

pub use entry::{Content, ResourceEntry, ResourceKind};


// ─── Pool ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct ResourcePool {
    entries: IndexMap<String, ResourceEntry>,
}

impl ResourcePool {
    pub fn builder() -> ResourcePoolBuilder {
        ResourcePoolBuilder::default()
    }

    /// Load the resources declared by a resolved module set.
    ///
    /// Modules are visited dependency-first; each entry is keyed as
    /// `/<module>/<path>`.
    pub fn from_modules(resolved: &ResolvedSet<'_>) -> Result<Self> {
        let mut builder = ResourcePool::builder();
        for name in resolved.graph().ordered_names() {
            let Some(module) = resolved.get(name) else {
                continue;
            };
            for resource in module.resources() {
                let path = format!("/{}/{}", name, resource.path.trim_start_matches('/'));
                builder.add(ResourceEntry::new(
                    name,
                    path,
                    resource.kind,
                    resource.content.clone(),
                ))?;
            }
        }
        let pool = builder.build();
        tracing::debug!(entries = pool.len(), "loaded module resources");
        Ok(pool)
    }

    pub fn by_path(&self, path: &str) -> Option<&ResourceEntry> {
        self.entries.get(path)
    }

    /// Entries in insertion order. Each call starts a fresh pass.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &ResourceEntry> + '_ {
        self.entries.values()
    }

    pub fn paths(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Derive a new pool by mapping every entry through `f`.
    ///
    /// `None` drops the entry, `Some` inserts the returned one (same or
    /// rewritten). The source pool is untouched.
    pub fn builder_with_transform<F>(&self, mut f: F) -> Result<ResourcePool>
    where
        F: FnMut(&ResourceEntry) -> Option<ResourceEntry>,
    {
        let mut builder = ResourcePool::builder();
        for entry in self.entries() {
            if let Some(out) = f(entry) {
                builder.add(out)?;
            }
        }
        Ok(builder.build())
    }

    /// BLAKE3 digest over every entry's path, kind and content, in order.
    pub fn digest(&self) -> Result<blake3::Hash> {
        let mut hasher = blake3::Hasher::new();
        for entry in self.entries() {
            let content = entry.content().read()?;
            hasher.update(&(entry.path().len() as u64).to_le_bytes());
            hasher.update(entry.path().as_bytes());
            hasher.update(entry.kind().as_str().as_bytes());
            hasher.update(&[0]);
            hasher.update(&(content.len() as u64).to_le_bytes());
            hasher.update(&content);
        }
        Ok(hasher.finalize())
    }
}

// ─── Builder ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ResourcePoolBuilder {
    entries: IndexMap<String, ResourceEntry>,
}

impl ResourcePoolBuilder {
    pub fn add(&mut self, entry: ResourceEntry) -> Result<()> {
        if self.entries.contains_key(entry.path()) {
            return Err(LinkError::DuplicateResource {
                path: entry.path().to_string(),
            });
        }
        self.entries.insert(entry.path().to_string(), entry);
        Ok(())
    }

    pub fn build(self) -> ResourcePool {
        ResourcePool {
            entries: self.entries,
        }
    }
}
