//! Catalog caching keyed by icon set and version.
//!
//! [`CatalogStore`] is the pluggable storage; [`CatalogCache`] layers the
//! get-or-build contract on top of it. Entries never expire on their own and
//! are only removed by [`CatalogCache::invalidate`] or [`CatalogCache::clear`].

mod file;
mod memory;

pub use file::FileCatalogStore;
pub use memory::MemoryCatalogStore;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::icon::Catalog;

/// Pluggable storage for built catalogs.
///
/// Writes must be atomic per key: a reader sees either the previous catalog
/// or the complete new one.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Get the catalog stored under `key`, if any.
    async fn get(&self, key: &str) -> Option<Arc<Catalog>>;
    /// Store a catalog under `key`, replacing any previous one.
    async fn set(&self, key: &str, catalog: Arc<Catalog>) -> std::result::Result<(), StoreError>;
    /// Remove the catalog stored under `key`.
    async fn del(&self, key: &str) -> std::result::Result<(), StoreError>;
    /// Remove every stored catalog.
    async fn clear(&self) -> std::result::Result<(), StoreError>;
}

#[async_trait]
impl<T: CatalogStore + ?Sized> CatalogStore for Arc<T> {
    async fn get(&self, key: &str) -> Option<Arc<Catalog>> {
        self.as_ref().get(key).await
    }
    async fn set(&self, key: &str, catalog: Arc<Catalog>) -> std::result::Result<(), StoreError> {
        self.as_ref().set(key, catalog).await
    }
    async fn del(&self, key: &str) -> std::result::Result<(), StoreError> {
        self.as_ref().del(key).await
    }
    async fn clear(&self) -> std::result::Result<(), StoreError> {
        self.as_ref().clear().await
    }
}

/// Get-or-build cache over a [`CatalogStore`].
///
/// Concurrent callers missing on the same key are coalesced: one runs the
/// builder while the others wait and then read its result from the store.
/// Different keys never wait on each other.
#[derive(Clone)]
pub struct CatalogCache {
    store: Arc<dyn CatalogStore>,
    building: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache").finish_non_exhaustive()
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(MemoryCatalogStore::default())
    }
}

impl CatalogCache {
    /// Create a cache over the given store
    pub fn new(store: impl CatalogStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            building: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Return the catalog cached under `key`, building and storing it on a miss.
    ///
    /// A failed build stores nothing and the error is returned unchanged. A
    /// failed store write is logged and the built catalog is still returned.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self, build)))]
    pub async fn get_or_build<F, Fut>(&self, key: &str, build: F) -> Result<Arc<Catalog>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Catalog>>,
    {
        if let Some(catalog) = self.store.get(key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!("catalog cache hit");
            return Ok(catalog);
        }

        let lock = self.build_lock(key).await;
        let result = {
            let _guard = lock.lock().await;
            self.build_locked(key, build).await
        };
        self.release_build_lock(key, lock).await;
        result
    }

    async fn build_locked<F, Fut>(&self, key: &str, build: F) -> Result<Arc<Catalog>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Catalog>>,
    {
        // another caller may have finished the build while we waited
        if let Some(catalog) = self.store.get(key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!("catalog built by concurrent caller");
            return Ok(catalog);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("catalog cache miss, building");

        let catalog = Arc::new(build().await?);
        if let Err(_e) = self.store.set(key, catalog.clone()).await {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "failed to store catalog");
        }
        Ok(catalog)
    }

    /// Remove the catalog cached under `key`
    pub async fn invalidate(&self, key: &str) -> Result<()> {
        self.store.del(key).await?;
        Ok(())
    }

    /// Remove every cached catalog
    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await?;
        #[cfg(feature = "tracing")]
        tracing::info!("catalog cache cleared");
        Ok(())
    }

    async fn build_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.building
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Drop the build lock for `key` once only the map and `lock` hold it.
    /// Clones are only taken under the map lock, so no waiter can appear.
    async fn release_build_lock(&self, key: &str, lock: Arc<Mutex<()>>) {
        let mut building = self.building.lock().await;
        let current = building.get(key).is_some_and(|held| Arc::ptr_eq(held, &lock));
        if current && Arc::strong_count(&lock) == 2 {
            building.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::icon::IconDefinition;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn catalog(id: &str) -> Catalog {
        Catalog::from_definitions([IconDefinition {
            id: id.into(),
            name: id.into(),
            unicode: "f000".into(),
            categories: ["Test".into()].into_iter().collect(),
        }])
    }

    #[tokio::test]
    async fn builds_once_until_cleared() {
        let cache = CatalogCache::default();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let build = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(catalog("star"))
        };

        let a = cache.get_or_build("font-awesome-4.7.0", build).await.unwrap();
        let b = cache.get_or_build("font-awesome-4.7.0", build).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, b);

        cache.clear().await.unwrap();
        cache.get_or_build("font-awesome-4.7.0", build).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_only_drops_one_key() {
        let cache = CatalogCache::default();
        cache
            .get_or_build("a", || async { Ok(catalog("a")) })
            .await
            .unwrap();
        cache
            .get_or_build("b", || async { Ok(catalog("b")) })
            .await
            .unwrap();
        cache.invalidate("a").await.unwrap();
        assert!(cache.store().get("a").await.is_none());
        assert!(cache.store().get("b").await.is_some());
    }

    #[tokio::test]
    async fn failed_build_is_not_cached() {
        let cache = CatalogCache::default();
        let err = cache
            .get_or_build("bad", || async { Err(Error::invalid_catalog("nope")) })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCatalogData { .. }));
        assert!(cache.store().get("bad").await.is_none());

        let ok = cache
            .get_or_build("bad", || async { Ok(catalog("fixed")) })
            .await
            .unwrap();
        assert!(ok.find("fixed").is_some());
    }

    #[tokio::test]
    async fn concurrent_misses_are_coalesced() {
        let cache = CatalogCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_build("shared", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok(catalog("star"))
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            let catalog = task.await.unwrap().unwrap();
            assert!(catalog.find("star").is_some());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn build_locks_are_released() {
        let cache = CatalogCache::default();
        cache
            .get_or_build("a", || async { Ok(catalog("a")) })
            .await
            .unwrap();
        cache
            .get_or_build("b", || async { Err(Error::invalid_catalog("nope")) })
            .await
            .unwrap_err();
        assert!(cache.building.lock().await.is_empty());

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_build("c", || async {
                            tokio::time::sleep(Duration::from_millis(10)).await;
                            Ok(catalog("c"))
                        })
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert!(cache.building.lock().await.is_empty());
    }
}
