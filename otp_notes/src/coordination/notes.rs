use chrono::Utc;

use crate::notes::{Note, NoteChanges, NoteStore};

use super::errors::CoordinationError;
use super::types::{CreateNoteRequest, MessageResponse, UpdateNoteRequest, Validate};

/// Per-user note operations. Callers pass an already authenticated user id.
#[derive(Clone)]
pub struct NotesService {
    notes: NoteStore,
}

impl NotesService {
    pub fn new(notes: NoteStore) -> Self {
        Self { notes }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Note>, CoordinationError> {
        Ok(self.notes.list_by_owner(user_id).await?)
    }

    pub async fn create(
        &self,
        user_id: &str,
        req: CreateNoteRequest,
    ) -> Result<Note, CoordinationError> {
        req.validate().map_err(CoordinationError::Validation)?;

        let note = self
            .notes
            .insert(Note::new(user_id, req.title, req.content))
            .await?;
        tracing::info!(note_id = %note.id, "Note created");
        Ok(note)
    }

    /// Foreign and nonexistent notes both report not found
    pub async fn update(
        &self,
        user_id: &str,
        note_id: &str,
        req: UpdateNoteRequest,
    ) -> Result<Note, CoordinationError> {
        req.validate().map_err(CoordinationError::Validation)?;

        let changes = NoteChanges {
            title: req.title,
            content: req.content,
        };

        self.notes
            .update_owned(user_id, note_id, &changes, Utc::now())
            .await?
            .ok_or_else(|| CoordinationError::not_found("Note", note_id))
    }

    pub async fn delete(
        &self,
        user_id: &str,
        note_id: &str,
    ) -> Result<MessageResponse, CoordinationError> {
        if !self.notes.delete_owned(user_id, note_id).await? {
            return Err(CoordinationError::not_found("Note", note_id));
        }

        tracing::info!(note_id = %note_id, "Note deleted");
        Ok(MessageResponse::new("Note deleted"))
    }
}
