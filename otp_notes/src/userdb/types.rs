use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A registered account
#[derive(Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Login email, unique and never changed after creation
    pub email: String,
    /// Argon2id PHC string, absent for Google-only accounts
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Subject identifier of a linked Google account
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh identifier
    pub fn new(email: String, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash: None,
            name,
            google_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = Some(password_hash);
        self
    }

    pub fn with_google_id(mut self, google_id: String) -> Self {
        self.google_id = Some(google_id);
        self
    }

    /// Whether the account can sign in at all
    pub fn is_usable(&self) -> bool {
        self.password_hash.is_some() || self.google_id.is_some()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("google_id", &self.google_id)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Search field options for user lookup
#[derive(Debug, Clone)]
pub enum UserSearchField {
    Id(String),
    Email(String),
    GoogleId(String),
}

impl fmt::Display for UserSearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserSearchField::Id(id) => write!(f, "id={id}"),
            UserSearchField::Email(email) => write!(f, "email={email}"),
            UserSearchField::GoogleId(google_id) => write!(f, "google_id={google_id}"),
        }
    }
}
