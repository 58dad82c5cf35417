use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{CacheStoreKind, CacheStoreSettings};
use crate::storage::errors::StorageError;

use super::types::{CacheStore, InMemoryCacheStore, RedisCacheStore, SharedCacheStore};

/// Create the configured cache store and verify that it is reachable
pub async fn connect_cache_store(
    settings: &CacheStoreSettings,
) -> Result<SharedCacheStore, StorageError> {
    tracing::info!("Initializing cache store with type: {:?}", settings.kind);

    let store: Box<dyn CacheStore> = match settings.kind {
        CacheStoreKind::Memory => Box::new(InMemoryCacheStore::new()),
        CacheStoreKind::Redis => {
            let client = redis::Client::open(settings.url.as_str()).map_err(|e| {
                tracing::error!("Failed to create Redis client: {}", e);
                StorageError::from(e)
            })?;
            Box::new(RedisCacheStore { client })
        }
    };

    store.init().await.inspect_err(|e| {
        tracing::error!("Failed to initialize cache store: {}", e);
    })?;

    tracing::info!("Connected to cache store: type={:?}", settings.kind);

    Ok(Arc::new(Mutex::new(store)))
}
