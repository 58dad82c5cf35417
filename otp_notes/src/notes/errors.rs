use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum NoteError {
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for NoteError {
    fn from(err: sqlx::Error) -> Self {
        NoteError::Storage(err.to_string())
    }
}
