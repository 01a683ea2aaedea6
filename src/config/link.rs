use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{config_error, read_file, relative_to};
use crate::error::Result;
use crate::pipeline::StageSpec;

/// Default link file name, looked up from the working directory upwards.
pub const LINK_FILE: &str = "modlink.toml";

/// Everything needed for one `modlink link` run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub roots: Vec<String>,
    pub output: Option<PathBuf>,
    /// Tracing filter, e.g. "info" or "modlink::pipeline=debug".
    pub log: Option<String>,
    /// Transform stages, run in file order.
    #[serde(default, rename = "stage")]
    pub stages: Vec<StageSpec>,
}

impl LinkConfig {
    /// Load a link file; relative paths are taken from its directory.
    pub fn load(path: &Path) -> Result<LinkConfig> {
        let text = read_file(path)?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<LinkConfig> {
        let mut config: LinkConfig = toml::from_str(text).map_err(|e| config_error(path, e))?;
        config.catalog = config.catalog.map(|p| relative_to(path, &p));
        config.output = config.output.map(|p| relative_to(path, &p));
        Ok(config)
    }

    /// Try to find a link file in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(LINK_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }
}
