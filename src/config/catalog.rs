use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{config_error, read_file, relative_to};
use crate::error::{LinkError, Result};
use crate::module::{Module, ModuleCatalog};
use crate::pool::{Content, ResourceKind};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default, rename = "module")]
    modules: Vec<ModuleDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleDecl {
    name: String,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default, rename = "resource")]
    resources: Vec<ResourceDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResourceDecl {
    path: String,
    #[serde(default)]
    kind: ResourceKind,
    content: Option<String>,
    file: Option<PathBuf>,
}

/// Read and parse a catalog file.
pub fn load_catalog(path: &Path) -> Result<ModuleCatalog> {
    let text = read_file(path)?;
    parse_catalog(&text, path)
}

/// Parse catalog TOML. `path` names the file in errors and anchors
/// relative `file = ...` resources.
pub fn parse_catalog(text: &str, path: &Path) -> Result<ModuleCatalog> {
    let file: CatalogFile = toml::from_str(text).map_err(|e| config_error(path, e))?;

    let mut modules = Vec::with_capacity(file.modules.len());
    for decl in file.modules {
        let mut module = Module::new(&decl.name).with_requires(decl.requires);
        for res in decl.resources {
            let content = match (res.content, res.file) {
                (Some(text), None) => Content::bytes(text),
                (None, Some(file)) => Content::File(relative_to(path, &file)),
                _ => {
                    return Err(LinkError::Config {
                        path: path.to_path_buf(),
                        message: format!(
                            "resource '{}' of module '{}' needs exactly one of `content` or `file`",
                            res.path, decl.name
                        ),
                        span: None,
                    })
                }
            };
            module = module.with_resource(res.path, res.kind, content);
        }
        modules.push(module);
    }

    ModuleCatalog::new(modules)
}
