use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};

/// How an entry is packaged into the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// Class files and ordinary module resources.
    #[default]
    ClassOrResource,
    Config,
    HeaderFile,
    LegalNotice,
    ManPage,
    NativeCmd,
    NativeLib,
    /// Files placed at the image root.
    Top,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::ClassOrResource,
        ResourceKind::Config,
        ResourceKind::HeaderFile,
        ResourceKind::LegalNotice,
        ResourceKind::ManPage,
        ResourceKind::NativeCmd,
        ResourceKind::NativeLib,
        ResourceKind::Top,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ClassOrResource => "class-or-resource",
            ResourceKind::Config => "config",
            ResourceKind::HeaderFile => "header-file",
            ResourceKind::LegalNotice => "legal-notice",
            ResourceKind::ManPage => "man-page",
            ResourceKind::NativeCmd => "native-cmd",
            ResourceKind::NativeLib => "native-lib",
            ResourceKind::Top => "top",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown resource kind '{}'", s))
    }
}

/// Entry payload: bytes held in memory, or a file read on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Bytes(Arc<[u8]>),
    File(PathBuf),
}

impl Content {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Content::Bytes(Arc::from(data.into()))
    }

    pub fn text(s: &str) -> Self {
        Content::bytes(s.as_bytes())
    }

    /// The payload bytes. Borrowed for in-memory content.
    pub fn read(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            Content::Bytes(bytes) => Ok(Cow::Borrowed(&bytes[..])),
            Content::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| LinkError::io(path, e)),
        }
    }
}

/// One addressable unit of image content. Immutable: the `with_*`
/// methods return a new entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceEntry {
    path: String,
    module: String,
    kind: ResourceKind,
    content: Content,
}

impl ResourceEntry {
    pub fn new(
        module: impl Into<String>,
        path: impl Into<String>,
        kind: ResourceKind,
        content: Content,
    ) -> Self {
        Self {
            path: path.into(),
            module: module.into(),
            kind,
            content,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of the module that contributed the entry.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    pub fn with_content(&self, content: Content) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }
}
