use std::path::PathBuf;

use bytes::Bytes;

use super::{CatalogSource, SourceFormat, resolve_location};
use crate::error::{Error, Result};

/// Definition documents on disk, e.g. a vendored copy of an icon set
#[derive(Debug, Clone)]
pub struct LocalSource {
    /// Path template containing `{version}`
    pub path_template: String,
    /// Document encoding
    pub format: SourceFormat,
}

impl LocalSource {
    /// Create a source for a path template
    pub fn new(path_template: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            path_template: path_template.into(),
            format,
        }
    }
}

impl CatalogSource for LocalSource {
    fn format(&self) -> SourceFormat {
        self.format
    }

    fn location(&self, version: &str) -> String {
        resolve_location(&self.path_template, version)
    }

    async fn fetch(&self, version: &str) -> Result<Bytes> {
        let location = self.location(version);
        let content = tokio::fs::read(PathBuf::from(&location))
            .await
            .map_err(|e| Error::source_unavailable(&location, e))?;
        Ok(Bytes::from(content))
    }
}
