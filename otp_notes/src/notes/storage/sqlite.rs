use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::notes::{
    errors::NoteError,
    types::{Note, NoteChanges},
};
use crate::storage::validate_sqlite_table_schema;

pub(super) async fn create_tables_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), NoteError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            sequence_number INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table_name}_user_id ON {table_name}(user_id)"
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn validate_note_tables_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), NoteError> {
    let expected_columns = vec![
        ("sequence_number", "INTEGER"),
        ("id", "TEXT"),
        ("user_id", "TEXT"),
        ("title", "TEXT"),
        ("content", "TEXT"),
        ("created_at", "TIMESTAMP"),
        ("updated_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(pool, table_name, &expected_columns, NoteError::Storage).await
}

pub(super) async fn list_notes_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    user_id: &str,
) -> Result<Vec<Note>, NoteError> {
    Ok(sqlx::query_as::<_, Note>(&format!(
        r#"
        SELECT * FROM {table_name}
        WHERE user_id = ?
        ORDER BY created_at DESC, sequence_number DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

async fn get_owned_note_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    user_id: &str,
    note_id: &str,
) -> Result<Option<Note>, NoteError> {
    Ok(sqlx::query_as::<_, Note>(&format!(
        "SELECT * FROM {table_name} WHERE id = ? AND user_id = ?"
    ))
    .bind(note_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

pub(super) async fn insert_note_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    note: Note,
) -> Result<Note, NoteError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, user_id, title, content, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#
    ))
    .bind(&note.id)
    .bind(&note.user_id)
    .bind(&note.title)
    .bind(&note.content)
    .bind(note.created_at)
    .bind(note.updated_at)
    .execute(pool)
    .await?;

    get_owned_note_sqlite(pool, table_name, &note.user_id, &note.id)
        .await?
        .ok_or_else(|| NoteError::Storage("Inserted note could not be read back".to_string()))
}

pub(super) async fn update_note_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    user_id: &str,
    note_id: &str,
    changes: &NoteChanges,
    now: DateTime<Utc>,
) -> Result<Option<Note>, NoteError> {
    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name}
        SET title = COALESCE(?, title), content = COALESCE(?, content), updated_at = ?
        WHERE id = ? AND user_id = ?
        "#
    ))
    .bind(&changes.title)
    .bind(&changes.content)
    .bind(now)
    .bind(note_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_owned_note_sqlite(pool, table_name, user_id, note_id).await
}

pub(super) async fn delete_note_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    user_id: &str,
    note_id: &str,
) -> Result<bool, NoteError> {
    let result = sqlx::query(&format!(
        "DELETE FROM {table_name} WHERE id = ? AND user_id = ?"
    ))
    .bind(note_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
