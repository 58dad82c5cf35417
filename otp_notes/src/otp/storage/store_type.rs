use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::otp::{errors::OtpError, types::OtpCode};
use crate::storage::DataStore;

use super::postgres::*;
use super::sqlite::*;

/// Ledger of outstanding one-time codes
#[derive(Clone)]
pub struct OtpStore {
    store: Arc<dyn DataStore>,
    table_name: String,
}

impl OtpStore {
    pub fn new(store: Arc<dyn DataStore>, table_prefix: &str) -> Self {
        Self {
            store,
            table_name: format!("{table_prefix}otp_codes"),
        }
    }

    pub async fn init(&self) -> Result<(), OtpError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool, &self.table_name).await?;
                validate_otp_tables_sqlite(pool, &self.table_name).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool, &self.table_name).await?;
                validate_otp_tables_postgres(pool, &self.table_name).await?;
                Ok(())
            }
            _ => Err(OtpError::Storage("Unsupported database type".to_string())),
        }
    }

    #[tracing::instrument(skip(self, otp), fields(email = %otp.email, expires_at = %otp.expires_at))]
    pub async fn insert(&self, otp: &OtpCode) -> Result<(), OtpError> {
        if let Some(pool) = self.store.as_sqlite() {
            insert_otp_sqlite(pool, &self.table_name, otp).await
        } else if let Some(pool) = self.store.as_postgres() {
            insert_otp_postgres(pool, &self.table_name, otp).await
        } else {
            Err(OtpError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Entry matching both email and code, preferring one still valid at
    /// `now`, then the most recently issued
    pub async fn find_match(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpCode>, OtpError> {
        if let Some(pool) = self.store.as_sqlite() {
            find_match_otp_sqlite(pool, &self.table_name, email, code, now).await
        } else if let Some(pool) = self.store.as_postgres() {
            find_match_otp_postgres(pool, &self.table_name, email, code, now).await
        } else {
            Err(OtpError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Returns false when the entry was already gone
    pub async fn delete(&self, id: &str) -> Result<bool, OtpError> {
        if let Some(pool) = self.store.as_sqlite() {
            delete_otp_sqlite(pool, &self.table_name, id).await
        } else if let Some(pool) = self.store.as_postgres() {
            delete_otp_postgres(pool, &self.table_name, id).await
        } else {
            Err(OtpError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Verify and consume a code.
    ///
    /// An expired entry is left in place for the purge task. When two callers
    /// race on the same entry only the one whose delete removes the row wins.
    #[tracing::instrument(skip(self, code))]
    pub async fn consume(&self, email: &str, code: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
        let otp = self
            .find_match(email, code, now)
            .await?
            .ok_or(OtpError::InvalidCode)?;

        if otp.is_expired_at(now) {
            tracing::debug!(expires_at = %otp.expires_at, "OTP found but expired");
            return Err(OtpError::Expired);
        }

        if !self.delete(&otp.id).await? {
            return Err(OtpError::InvalidCode);
        }

        Ok(())
    }

    /// Delete every entry with `expires_at <= now`
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, OtpError> {
        if let Some(pool) = self.store.as_sqlite() {
            purge_expired_sqlite(pool, &self.table_name, now).await
        } else if let Some(pool) = self.store.as_postgres() {
            purge_expired_postgres(pool, &self.table_name, now).await
        } else {
            Err(OtpError::Storage("Unsupported database type".to_string()))
        }
    }
}
