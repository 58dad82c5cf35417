use async_trait::async_trait;
use redis::AsyncCommands;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheStore, RedisCacheStore};

const KEY_NAMESPACE: &str = "otp_notes";

impl RedisCacheStore {
    fn namespaced(prefix: &str, key: &str) -> String {
        format!("{KEY_NAMESPACE}:{prefix}:{key}")
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError> {
        // Redis rejects SETEX with a zero lifetime
        if ttl == 0 {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(&value)?;
        let _: () = conn
            .set_ex(Self::namespaced(prefix, key), payload, ttl as u64)
            .await?;
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(Self::namespaced(prefix, key)).await?;
        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(StorageError::from)
    }
}
