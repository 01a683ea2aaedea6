//! Writing a finished pool to disk.
//!
//! The directory image mirrors the pool's paths under an output root and
//! records every file in `image-manifest.toml`.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LinkError, Result};
use crate::pool::{ResourceEntry, ResourceKind, ResourcePool};

pub const MANIFEST_FILE: &str = "image-manifest.toml";

/// Consumes a final pool.
pub trait ImageWriter {
    fn write(&self, pool: &ResourcePool) -> Result<ImageManifest>;
}

// ─── Manifest ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageManifest {
    /// Digest of the whole pool, see [`ResourcePool::digest`].
    pub digest: String,
    #[serde(default, rename = "entry")]
    pub entries: Vec<ManifestEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub module: String,
    pub kind: ResourceKind,
    pub size: u64,
    pub blake3: String,
}

impl ImageManifest {
    /// Read the manifest of an image directory.
    pub fn load(image_dir: &Path) -> Result<ImageManifest> {
        let path = image_dir.join(MANIFEST_FILE);
        let text = std::fs::read_to_string(&path).map_err(|e| LinkError::io(&path, e))?;
        toml::from_str(&text).map_err(|e| LinkError::Config {
            path,
            message: e.message().to_string(),
            span: e.span(),
        })
    }

    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }
}

// ─── Directory image ───────────────────────────────────────────────

/// Writes each entry to `<output>/<path without leading '/'>`.
#[derive(Clone, Debug)]
pub struct DirectoryImage {
    output: PathBuf,
}

impl DirectoryImage {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    /// Make sure the output directory exists and is empty. Returns true
    /// when it had to be created.
    fn prepare_output(&self) -> Result<bool> {
        match std::fs::read_dir(&self.output) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    return Err(LinkError::OutputExists {
                        path: self.output.clone(),
                    });
                }
                Ok(false)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                std::fs::create_dir_all(&self.output)
                    .map_err(|e| LinkError::io(&self.output, e))?;
                Ok(true)
            }
            Err(e) => Err(LinkError::io(&self.output, e)),
        }
    }

    /// Remove whatever a failed write left behind, returning the output
    /// directory to its state before the write.
    fn discard(&self, created: bool) {
        let result = if created {
            std::fs::remove_dir_all(&self.output)
        } else {
            std::fs::read_dir(&self.output).and_then(|entries| {
                for entry in entries {
                    let path = entry?.path();
                    if path.is_dir() {
                        std::fs::remove_dir_all(&path)?;
                    } else {
                        std::fs::remove_file(&path)?;
                    }
                }
                Ok(())
            })
        };
        if let Err(e) = result {
            warn!(output = %self.output.display(), error = %e, "could not clean up partial image");
        }
    }

    fn write_staged(&self, staged: &[Staged<'_>], manifest_text: &str) -> Result<()> {
        staged.par_iter().try_for_each(|item| {
            let target = self.output.join(&item.relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| LinkError::io(parent, e))?;
            }
            std::fs::write(&target, &item.bytes).map_err(|e| LinkError::io(&target, e))?;
            debug!(path = item.entry.path(), size = item.bytes.len(), "wrote entry");
            Ok(())
        })?;
        let manifest_path = self.output.join(MANIFEST_FILE);
        std::fs::write(&manifest_path, manifest_text).map_err(|e| LinkError::io(&manifest_path, e))
    }
}

/// An entry whose target path and content are known before any write.
struct Staged<'p> {
    entry: &'p ResourceEntry,
    relative: PathBuf,
    bytes: Cow<'p, [u8]>,
}

impl Staged<'_> {
    fn manifest_entry(&self) -> ManifestEntry {
        ManifestEntry {
            path: self.entry.path().to_string(),
            module: self.entry.module().to_string(),
            kind: self.entry.kind(),
            size: self.bytes.len() as u64,
            blake3: blake3::hash(&self.bytes).to_hex().to_string(),
        }
    }
}

impl ImageWriter for DirectoryImage {
    fn write(&self, pool: &ResourcePool) -> Result<ImageManifest> {
        // Validate every path and read every payload before touching the disk.
        let entries: Vec<&ResourceEntry> = pool.entries().collect();
        let staged = entries
            .par_iter()
            .map(|&entry| -> Result<Staged<'_>> {
                Ok(Staged {
                    entry,
                    relative: relative_path(entry.path())?,
                    bytes: entry.content().read()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let manifest = ImageManifest {
            digest: pool.digest()?.to_hex().to_string(),
            entries: staged.par_iter().map(|s| s.manifest_entry()).collect(),
        };
        let manifest_text = toml::to_string(&manifest).map_err(|e| LinkError::Config {
            path: self.output.join(MANIFEST_FILE),
            message: e.to_string(),
            span: None,
        })?;

        let created = self.prepare_output()?;
        if let Err(e) = self.write_staged(&staged, &manifest_text) {
            self.discard(created);
            return Err(e);
        }

        info!(
            output = %self.output.display(),
            entries = manifest.entries.len(),
            bytes = manifest.total_size(),
            "image written"
        );
        Ok(manifest)
    }
}

/// Map a pool path onto a path below the image root. Only plain,
/// non-empty segments are allowed, and the manifest name is reserved.
fn relative_path(path: &str) -> Result<PathBuf> {
    let unsafe_path = || LinkError::UnsafePath {
        path: path.to_string(),
    };
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() || trimmed == MANIFEST_FILE || trimmed.contains('\\') {
        return Err(unsafe_path());
    }
    let mut out = PathBuf::new();
    for segment in trimmed.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(unsafe_path());
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => out.push(part),
            _ => return Err(unsafe_path()),
        }
    }
    Ok(out)
}
