use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::notes::{
    errors::NoteError,
    types::{Note, NoteChanges},
};
use crate::storage::DataStore;

use super::postgres::*;
use super::sqlite::*;

/// Notes table access, every query scoped to an owner
#[derive(Clone)]
pub struct NoteStore {
    store: Arc<dyn DataStore>,
    table_name: String,
}

impl NoteStore {
    pub fn new(store: Arc<dyn DataStore>, table_prefix: &str) -> Self {
        Self {
            store,
            table_name: format!("{table_prefix}notes"),
        }
    }

    pub async fn init(&self) -> Result<(), NoteError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool, &self.table_name).await?;
                validate_note_tables_sqlite(pool, &self.table_name).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool, &self.table_name).await?;
                validate_note_tables_postgres(pool, &self.table_name).await?;
                Ok(())
            }
            _ => Err(NoteError::Storage("Unsupported database type".to_string())),
        }
    }

    /// Notes of `user_id`, newest first
    #[tracing::instrument(skip(self))]
    pub async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Note>, NoteError> {
        if let Some(pool) = self.store.as_sqlite() {
            list_notes_sqlite(pool, &self.table_name, user_id).await
        } else if let Some(pool) = self.store.as_postgres() {
            list_notes_postgres(pool, &self.table_name, user_id).await
        } else {
            Err(NoteError::Storage("Unsupported database type".to_string()))
        }
    }

    #[tracing::instrument(skip(self, note), fields(note_id = %note.id, user_id = %note.user_id))]
    pub async fn insert(&self, note: Note) -> Result<Note, NoteError> {
        if let Some(pool) = self.store.as_sqlite() {
            insert_note_sqlite(pool, &self.table_name, note).await
        } else if let Some(pool) = self.store.as_postgres() {
            insert_note_postgres(pool, &self.table_name, note).await
        } else {
            Err(NoteError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Apply `changes` to a note owned by `user_id`.
    ///
    /// Returns `None` when no such note exists for this owner.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_owned(
        &self,
        user_id: &str,
        note_id: &str,
        changes: &NoteChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Note>, NoteError> {
        if let Some(pool) = self.store.as_sqlite() {
            update_note_sqlite(pool, &self.table_name, user_id, note_id, changes, now).await
        } else if let Some(pool) = self.store.as_postgres() {
            update_note_postgres(pool, &self.table_name, user_id, note_id, changes, now).await
        } else {
            Err(NoteError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Returns false when no such note exists for this owner
    #[tracing::instrument(skip(self))]
    pub async fn delete_owned(&self, user_id: &str, note_id: &str) -> Result<bool, NoteError> {
        if let Some(pool) = self.store.as_sqlite() {
            delete_note_sqlite(pool, &self.table_name, user_id, note_id).await
        } else if let Some(pool) = self.store.as_postgres() {
            delete_note_postgres(pool, &self.table_name, user_id, note_id).await
        } else {
            Err(NoteError::Storage("Unsupported database type".to_string()))
        }
    }
}
