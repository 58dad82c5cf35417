use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::storage::{CacheData, SharedCacheStore};

use super::errors::TokenVerificationError;

const JWKS_CACHE_PREFIX: &str = "jwks";
const CACHE_EXPIRATION: Duration = Duration::from_secs(600);

#[derive(Debug, Serialize, Deserialize, Clone)]
pub(super) struct Jwks {
    pub(super) keys: Vec<Jwk>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub(super) struct Jwk {
    pub(super) kty: String,
    pub(super) kid: String,
    #[serde(default)]
    pub(super) alg: Option<String>,
    #[serde(default)]
    pub(super) n: Option<String>,
    #[serde(default)]
    pub(super) e: Option<String>,
    #[serde(default)]
    pub(super) x: Option<String>,
    #[serde(default)]
    pub(super) y: Option<String>,
    #[serde(default)]
    pub(super) crv: Option<String>,
    #[serde(default)]
    pub(super) k: Option<String>,
}

impl Jwks {
    pub(super) fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(super) struct JwksCache {
    pub(super) jwks: Jwks,
    pub(super) expires_at: DateTime<Utc>,
}

impl TryFrom<JwksCache> for CacheData {
    type Error = TokenVerificationError;

    fn try_from(cache: JwksCache) -> Result<Self, Self::Error> {
        Ok(Self {
            value: serde_json::to_string(&cache)?,
        })
    }
}

impl TryFrom<CacheData> for JwksCache {
    type Error = TokenVerificationError;

    fn try_from(cache_data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&cache_data.value)
            .map_err(|e| TokenVerificationError::JwksParsing(e.to_string()))
    }
}

/// Keys from `jwks_url`, served from the cache for ten minutes
pub(super) async fn fetch_jwks(
    http: &reqwest::Client,
    cache: &SharedCacheStore,
    jwks_url: &str,
) -> Result<Jwks, TokenVerificationError> {
    if let Some(cached) = cache
        .lock()
        .await
        .get(JWKS_CACHE_PREFIX, jwks_url)
        .await
        .map_err(|e| TokenVerificationError::JwksFetch(format!("Cache error: {e}")))?
    {
        let jwks_cache: JwksCache = cached.try_into()?;
        if jwks_cache.expires_at > Utc::now() {
            tracing::debug!("Returning valid cached JWKs");
            return Ok(jwks_cache.jwks);
        }
    }

    let jwks: Jwks = http
        .get(jwks_url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| TokenVerificationError::JwksFetch(e.to_string()))?
        .json()
        .await
        .map_err(|e| TokenVerificationError::JwksParsing(e.to_string()))?;
    tracing::debug!(keys = jwks.keys.len(), "JWKs fetched from URL");

    store_jwks(cache, jwks_url, jwks.clone()).await?;

    Ok(jwks)
}

pub(super) async fn store_jwks(
    cache: &SharedCacheStore,
    jwks_url: &str,
    jwks: Jwks,
) -> Result<(), TokenVerificationError> {
    let jwks_cache = JwksCache {
        jwks,
        expires_at: Utc::now() + CACHE_EXPIRATION,
    };

    cache
        .lock()
        .await
        .put_with_ttl(
            JWKS_CACHE_PREFIX,
            jwks_url,
            jwks_cache.try_into()?,
            CACHE_EXPIRATION.as_secs() as usize,
        )
        .await
        .map_err(|e| TokenVerificationError::JwksFetch(format!("Cache error: {e}")))
}
