//! On-disk inputs: the module catalog file and the link file.
//!
//! Both are TOML. The core never reads files itself; these loaders build
//! the in-memory [`ModuleCatalog`](crate::module::ModuleCatalog) and the
//! stage list the core consumes.

use std::path::{Path, PathBuf};

use crate::error::{LinkError, Result};

mod catalog;
mod link;

pub use catalog::{load_catalog, parse_catalog};
pub use link::{LinkConfig, LINK_FILE};

#[cfg(test)]
mod tests;

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| LinkError::io(path, e))
}

fn config_error(path: &Path, err: toml::de::Error) -> LinkError {
    LinkError::Config {
        path: path.to_path_buf(),
        message: err.message().to_string(),
        span: err.span(),
    }
}

/// Resolve `p` against the directory holding the file at `origin`.
fn relative_to(origin: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        return p.to_path_buf();
    }
    match origin.parent() {
        Some(dir) => dir.join(p),
        None => p.to_path_buf(),
    }
}
