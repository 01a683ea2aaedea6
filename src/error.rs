//! Error taxonomy shared by the resolver, the resource pool, the plugins
//! and the outer loaders.
//!
//! Every variant is terminal for the operation that raised it: nothing is
//! retried and no partial result accompanies an error.

use std::ops::Range;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while assembling an image.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Two modules in one catalog share a name.
    #[error("duplicate module '{name}' in catalog")]
    DuplicateModule { name: String },

    /// A requested root is not in the catalog.
    #[error("root module '{name}' not found")]
    UnresolvedRoot { name: String },

    /// A resolved module requires a name the catalog does not have.
    #[error("module '{module}' requires '{missing}', which is not in the catalog")]
    UnresolvedDependency { module: String, missing: String },

    /// Two entries of one pool share a path.
    #[error("duplicate resource '{path}'")]
    DuplicateResource { path: String },

    /// A pattern specification could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A plugin was configured without its own option.
    #[error("plugin '{plugin}' requires an argument")]
    MissingArgument { plugin: String },

    /// A plugin was asked to transform before it was configured.
    #[error("plugin '{plugin}' used before configuration")]
    NotConfigured { plugin: String },

    /// No built-in plugin carries this name.
    #[error("unknown plugin '{name}'")]
    UnknownPlugin { name: String },

    /// A configuration file is malformed.
    #[error("{}: {message}", .path.display())]
    Config {
        path: PathBuf,
        message: String,
        /// Byte range of the offending text, when the parser knows it.
        span: Option<Range<usize>>,
    },

    #[error("cannot access '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image output directory already holds files.
    #[error("output directory '{}' already exists and is not empty", .path.display())]
    OutputExists { path: PathBuf },

    /// A resource path would escape the image directory.
    #[error("resource path '{path}' is not a safe relative path")]
    UnsafePath { path: String },
}

impl LinkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LinkError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        LinkError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Short hint shown under the error by the command-line front end.
    pub fn help(&self) -> Option<String> {
        match self {
            LinkError::UnresolvedRoot { .. } => {
                Some("check the --add-modules list against the catalog".to_string())
            }
            LinkError::UnresolvedDependency { missing, .. } => Some(format!(
                "add a module named '{}' to the catalog or drop the requirement",
                missing
            )),
            LinkError::DuplicateResource { .. } => {
                Some("two modules or a transform produced the same path".to_string())
            }
            LinkError::InvalidPattern { .. } => Some(
                "patterns are comma-separated globs, `regex:<re>`, `glob:<g>` or `@<file>`"
                    .to_string(),
            ),
            LinkError::MissingArgument { plugin } => {
                Some(format!("pass it as --stage {}=<patterns>", plugin))
            }
            LinkError::UnknownPlugin { .. } => {
                Some("run `modlink plugins` to list the available plugins".to_string())
            }
            LinkError::OutputExists { .. } => {
                Some("remove the directory or choose another --output".to_string())
            }
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinkError>;
