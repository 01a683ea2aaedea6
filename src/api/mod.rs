//! One-call entry points over the core: resolve roots, load their
//! resources into a pool, run the stages and optionally write the image.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::load_catalog;
use crate::error::Result;
use crate::image::{DirectoryImage, ImageManifest, ImageWriter};
use crate::module::{resolve, ModuleCatalog};
use crate::pipeline::{Pipeline, StageSpec};
use crate::plugin::PluginRegistry;
use crate::pool::ResourcePool;


/// Result of [`assemble`]: the modules that went in, dependency first,
/// and the pool the last stage produced.
#[derive(Clone, Debug)]
pub struct Assembly {
    pub modules: Vec<String>,
    pub pool: ResourcePool,
}

impl Assembly {
    pub fn module_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.modules.iter().map(String::as_str)
    }
}

/// Resolve `roots`, load the resolved modules' resources and run the
/// pipeline over them. Fails without partial output on the first error.
pub fn assemble<S: AsRef<str>>(
    catalog: &ModuleCatalog,
    roots: &[S],
    pipeline: &Pipeline,
) -> Result<Assembly> {
    let resolved = resolve(catalog, roots)?;
    let modules = resolved
        .graph()
        .ordered_names()
        .into_iter()
        .map(String::from)
        .collect();
    let pool = ResourcePool::from_modules(&resolved)?;
    let pool = pipeline.run(&pool)?;
    Ok(Assembly { modules, pool })
}

/// Everything a full link run needs, already merged from flags and the
/// link file.
#[derive(Clone, Debug, Default)]
pub struct LinkRequest {
    pub catalog: PathBuf,
    pub roots: Vec<String>,
    pub stages: Vec<StageSpec>,
    pub output: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LinkOutcome {
    pub assembly: Assembly,
    pub manifest: ImageManifest,
}

/// Load the catalog, configure the stages from the built-in registry,
/// assemble and write a directory image.
pub fn link(request: &LinkRequest) -> Result<LinkOutcome> {
    let catalog = load_catalog(&request.catalog)?;
    let pipeline = Pipeline::configure(&PluginRegistry::builtin(), &request.stages)?;
    if pipeline.is_empty() {
        debug!("no stages configured");
    }
    let assembly = assemble(&catalog, &request.roots, &pipeline)?;
    let manifest = DirectoryImage::new(&request.output).write(&assembly.pool)?;
    info!(
        modules = assembly.modules.len(),
        stages = pipeline.len(),
        entries = manifest.entries.len(),
        "link finished"
    );
    Ok(LinkOutcome { assembly, manifest })
}
