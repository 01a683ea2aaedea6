pub mod api;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod image;
pub mod logging;
pub mod module;
pub mod pipeline;
pub mod plugin;
pub mod pool;

// Re-exports: the common entry points at the crate root
pub use api::{assemble, link, Assembly, LinkOutcome, LinkRequest};
pub use error::{LinkError, Result};
pub use image::{DirectoryImage, ImageManifest, ImageWriter};
pub use module::{resolve, Module, ModuleCatalog, ResolvedSet};
pub use pipeline::{Pipeline, StageSpec};
pub use plugin::{ExcludePlugin, Plugin, PluginRegistry, ResourceFilter};
pub use pool::{Content, ResourceEntry, ResourceKind, ResourcePool};
