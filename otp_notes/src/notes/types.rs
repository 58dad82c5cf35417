use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A note owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Database-assigned insertion order, used to break created_at ties
    #[serde(skip)]
    pub sequence_number: Option<i64>,
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(user_id: &str, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            sequence_number: None,
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a note; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}
