use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

/// Cache store shared between request handlers
pub type SharedCacheStore = Arc<Mutex<Box<dyn CacheStore>>>;

pub(crate) struct InMemoryCacheStore {
    pub(super) entry: HashMap<String, (CacheData, DateTime<Utc>)>,
}

pub(crate) struct RedisCacheStore {
    pub(super) client: redis::Client,
}

#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Check that the backend is reachable
    async fn init(&self) -> Result<(), StorageError>;

    /// Store a value for `ttl` seconds
    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError>;

    /// Get a value from the store. Expired values are never returned.
    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;
}
