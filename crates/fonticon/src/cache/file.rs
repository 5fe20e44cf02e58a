//! Directory-backed catalog storage

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::CatalogStore;
use crate::error::StoreError;
use crate::icon::Catalog;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Catalog store keeping one JSON file per key in a directory.
///
/// Survives restarts and is shared between processes, so a flush run from
/// a deploy hook clears catalogs for a running server too. Files are written
/// to a temporary name and renamed into place; unreadable files count as
/// misses.
#[derive(Clone, Debug)]
pub struct FileCatalogStore {
    dir: PathBuf,
}

impl FileCatalogStore {
    /// Create a store in `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the catalog files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// ASCII letters, digits, `-` and `.` are kept; every other byte,
    /// including `_`, is written as `_XX` hex so distinct keys never share
    /// a file and no key can leave the directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for b in key.bytes() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.') {
                name.push(b as char);
            } else {
                let _ = write!(name, "_{b:02X}");
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

#[async_trait]
impl CatalogStore for FileCatalogStore {
    async fn get(&self, key: &str) -> Option<Arc<Catalog>> {
        let path = self.path_for(key);
        let content = tokio::fs::read(&path).await.ok()?;
        match serde_json::from_slice::<Catalog>(&content) {
            Ok(catalog) => Some(Arc::new(catalog)),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(path = %path.display(), error = %_e, "ignoring unreadable cached catalog");
                None
            }
        }
    }

    async fn set(&self, key: &str, catalog: Arc<Catalog>) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let json = serde_json::to_vec(catalog.as_ref())?;

        let temp = path.with_extension(format!(
            "json.tmp-{}-{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::write(&temp, json).await?;
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(())
    }
}
