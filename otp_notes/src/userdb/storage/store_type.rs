use std::sync::Arc;

use crate::storage::DataStore;
use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField},
};

use super::postgres::*;
use super::sqlite::*;

/// Persistent user records
#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn DataStore>,
    table_name: String,
}

impl UserStore {
    pub fn new(store: Arc<dyn DataStore>, table_prefix: &str) -> Self {
        Self {
            store,
            table_name: format!("{table_prefix}users"),
        }
    }

    /// Initialize the user database tables
    pub async fn init(&self) -> Result<(), UserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool, &self.table_name).await?;
                validate_user_tables_sqlite(pool, &self.table_name).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool, &self.table_name).await?;
                validate_user_tables_postgres(pool, &self.table_name).await?;
                Ok(())
            }
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    #[tracing::instrument(skip(self), fields(user_field = %field))]
    pub async fn get_user_by(&self, field: UserSearchField) -> Result<Option<User>, UserError> {
        let result = if let Some(pool) = self.store.as_sqlite() {
            get_user_by_field_sqlite(pool, &self.table_name, &field).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_user_by_field_postgres(pool, &self.table_name, &field).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(Some(_)) => {
                tracing::debug!(found = true, "User lookup completed");
            }
            Ok(None) => {
                tracing::debug!(found = false, "User lookup completed - not found");
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed");
            }
        }

        result
    }

    /// Insert a new user. Fails with `UserError::Duplicate` when the email is taken.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn create_user(&self, user: User) -> Result<User, UserError> {
        let result = if let Some(pool) = self.store.as_sqlite() {
            insert_user_sqlite(pool, &self.table_name, user).await
        } else if let Some(pool) = self.store.as_postgres() {
            insert_user_postgres(pool, &self.table_name, user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(user) => tracing::info!(user_id = %user.id, "User created"),
            Err(UserError::Duplicate(_)) => tracing::warn!("User creation hit an existing email"),
            Err(e) => tracing::error!(error = %e, "User creation failed"),
        }

        result
    }

    /// Attach an external identity to an account that has none yet.
    ///
    /// Linking is idempotent: an account that already carries a google id is
    /// returned unchanged.
    #[tracing::instrument(skip(self, google_id), fields(user_id = %user_id))]
    pub async fn link_google_id(&self, user_id: &str, google_id: &str) -> Result<User, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            link_google_id_sqlite(pool, &self.table_name, user_id, google_id).await
        } else if let Some(pool) = self.store.as_postgres() {
            link_google_id_postgres(pool, &self.table_name, user_id, google_id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::memory_data_store;

    async fn user_store() -> UserStore {
        let store = UserStore::new(memory_data_store().await, "test_");
        store.init().await.expect("Failed to init user store");
        store
    }

    #[tokio::test]
    async fn test_init_is_repeatable() {
        let store = user_store().await;
        assert!(store.init().await.is_ok());
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        // Given a fresh store
        let store = user_store().await;
        let user = User::new("alice@example.com".to_string(), Some("Alice".to_string()))
            .with_password_hash("hash".to_string());

        // When the user is created
        let created = store.create_user(user.clone()).await.unwrap();

        // Then it can be found by id and by email
        assert_eq!(created.id, user.id);
        let by_id = store
            .get_user_by(UserSearchField::Id(user.id.clone()))
            .await
            .unwrap()
            .unwrap();
        let by_email = store
            .get_user_by(UserSearchField::Email("alice@example.com".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_id.id, user.id);
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.password_hash.as_deref(), Some("hash"));
        assert_eq!(by_email.name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_lookup_missing_user_returns_none() {
        let store = user_store().await;
        let found = store
            .get_user_by(UserSearchField::Email("nobody@example.com".to_string()))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        // Given an existing user
        let store = user_store().await;
        store
            .create_user(User::new("dup@example.com".to_string(), None))
            .await
            .unwrap();

        // When another user with the same email is inserted
        let result = store
            .create_user(User::new("dup@example.com".to_string(), None))
            .await;

        // Then the unique constraint surfaces as Duplicate
        assert!(matches!(result, Err(UserError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_link_google_id_is_idempotent() {
        // Given a password-only user
        let store = user_store().await;
        let user = store
            .create_user(
                User::new("link@example.com".to_string(), None)
                    .with_password_hash("hash".to_string()),
            )
            .await
            .unwrap();

        // When a google id is linked twice with different subjects
        let first = store.link_google_id(&user.id, "google-1").await.unwrap();
        let second = store.link_google_id(&user.id, "google-2").await.unwrap();

        // Then the first link sticks
        assert_eq!(first.google_id.as_deref(), Some("google-1"));
        assert_eq!(second.google_id.as_deref(), Some("google-1"));
        assert_eq!(second.password_hash.as_deref(), Some("hash"));

        let by_google = store
            .get_user_by(UserSearchField::GoogleId("google-1".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_google.id, user.id);
    }

    #[tokio::test]
    async fn test_link_google_id_for_missing_user() {
        let store = user_store().await;
        let result = store.link_google_id("missing", "google-1").await;
        assert!(matches!(result, Err(UserError::NotFound)));
    }
}
