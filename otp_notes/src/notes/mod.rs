mod errors;
mod storage;
mod types;

pub use errors::NoteError;
pub use storage::NoteStore;
pub use types::{Note, NoteChanges};
