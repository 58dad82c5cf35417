use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use std::fmt;

use crate::utils::gen_numeric_code;

use super::errors::OtpError;

/// A one-time code mailed to an address
#[derive(Clone, FromRow, PartialEq)]
pub struct OtpCode {
    pub id: String,
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OtpCode {
    /// Issue a fresh random code for `email` valid for `ttl`
    pub fn issue(email: &str, ttl: Duration) -> Result<Self, OtpError> {
        let code = gen_numeric_code()?;
        Ok(Self::with_code(email, &code, Utc::now(), ttl))
    }

    pub(crate) fn with_code(email: &str, code: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            code: code.to_string(),
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Expired codes never verify; the same predicate drives the purge task
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpCode")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("code", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}
