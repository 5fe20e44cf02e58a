use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CatalogStore;
use crate::error::StoreError;
use crate::icon::Catalog;

/// In-memory catalog store, scoped to the process.
#[derive(Clone, Default)]
pub struct MemoryCatalogStore(Arc<RwLock<HashMap<String, Arc<Catalog>>>>);

impl MemoryCatalogStore {
    /// Number of stored catalogs
    pub async fn len(&self) -> usize {
        self.0.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.0.read().await.is_empty()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn get(&self, key: &str) -> Option<Arc<Catalog>> {
        self.0.read().await.get(key).cloned()
    }
    async fn set(&self, key: &str, catalog: Arc<Catalog>) -> Result<(), StoreError> {
        self.0.write().await.insert(key.to_string(), catalog);
        Ok(())
    }
    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.0.write().await.remove(key);
        Ok(())
    }
    async fn clear(&self) -> Result<(), StoreError> {
        self.0.write().await.clear();
        Ok(())
    }
}
