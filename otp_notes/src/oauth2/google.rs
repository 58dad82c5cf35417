use async_trait::async_trait;
use chrono::Utc;

use crate::config::GoogleSettings;
use crate::storage::SharedCacheStore;

use super::errors::TokenVerificationError;
use super::idtoken::verify_idtoken;
use super::jwks::fetch_jwks;

/// Identity asserted by an external provider
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalIdentity {
    /// Provider subject id
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}

/// Verifies id tokens issued by an external identity provider
#[async_trait]
pub trait IdTokenVerifier: Send + Sync + 'static {
    async fn verify(&self, id_token: &str) -> Result<ExternalIdentity, TokenVerificationError>;
}

/// Google id-token verification against the published JWKS
pub struct GoogleIdTokenVerifier {
    client_id: String,
    jwks_url: String,
    http: reqwest::Client,
    cache: SharedCacheStore,
}

impl GoogleIdTokenVerifier {
    pub fn new(settings: &GoogleSettings, cache: SharedCacheStore) -> Self {
        Self {
            client_id: settings.client_id.clone(),
            jwks_url: settings.jwks_url.clone(),
            http: reqwest::Client::new(),
            cache,
        }
    }
}

#[async_trait]
impl IdTokenVerifier for GoogleIdTokenVerifier {
    #[tracing::instrument(skip_all)]
    async fn verify(&self, id_token: &str) -> Result<ExternalIdentity, TokenVerificationError> {
        let jwks = fetch_jwks(&self.http, &self.cache, &self.jwks_url).await?;
        let idinfo = verify_idtoken(id_token, &self.client_id, &jwks, Utc::now().timestamp())?;

        let email = idinfo
            .email
            .filter(|email| !email.is_empty())
            .ok_or(TokenVerificationError::MissingEmail)?;

        tracing::debug!(subject = %idinfo.sub, "Google id token verified");

        Ok(ExternalIdentity {
            subject: idinfo.sub,
            email,
            name: idinfo.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::oauth2::idtoken::tests::{claims, sign, test_jwks};
    use crate::oauth2::jwks::store_jwks;
    use crate::storage::connect_cache_store;

    async fn verifier_with_cached_keys() -> GoogleIdTokenVerifier {
        let settings = Settings::in_memory();
        let cache = connect_cache_store(&settings.cache_store).await.unwrap();
        let mut google = settings.google.clone();
        google.jwks_url = "http://127.0.0.1:1/certs".to_string();
        store_jwks(&cache, &google.jwks_url, test_jwks()).await.unwrap();
        GoogleIdTokenVerifier::new(&google, cache)
    }

    #[tokio::test]
    async fn test_verify_extracts_identity() {
        let verifier = verifier_with_cached_keys().await;
        let token = sign(claims(Utc::now().timestamp()));

        let identity = verifier.verify(&token).await.unwrap();

        assert_eq!(
            identity,
            ExternalIdentity {
                subject: "google-sub-1".to_string(),
                email: "gina@example.com".to_string(),
                name: Some("Gina".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_token_without_email_is_rejected() {
        let verifier = verifier_with_cached_keys().await;
        let mut c = claims(Utc::now().timestamp());
        c.as_object_mut().unwrap().remove("email");

        let result = verifier.verify(&sign(c)).await;

        assert!(matches!(result, Err(TokenVerificationError::MissingEmail)));
    }

    #[tokio::test]
    async fn test_unreachable_key_endpoint_is_provider_failure() {
        let settings = Settings::in_memory();
        let cache = connect_cache_store(&settings.cache_store).await.unwrap();
        let mut google = settings.google.clone();
        google.jwks_url = "http://127.0.0.1:1/certs".to_string();
        let verifier = GoogleIdTokenVerifier::new(&google, cache);

        let err = verifier
            .verify(&sign(claims(Utc::now().timestamp())))
            .await
            .unwrap_err();

        assert!(err.is_provider_failure());
    }
}
