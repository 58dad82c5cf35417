use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::notes::{
    errors::NoteError,
    types::{Note, NoteChanges},
};
use crate::storage::validate_postgres_table_schema;

pub(super) async fn create_tables_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), NoteError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            sequence_number BIGSERIAL PRIMARY KEY,
            id TEXT NOT NULL UNIQUE,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
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

pub(super) async fn validate_note_tables_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), NoteError> {
    let expected_columns = vec![
        ("sequence_number", "bigint"),
        ("id", "text"),
        ("user_id", "text"),
        ("title", "text"),
        ("content", "text"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, table_name, &expected_columns, NoteError::Storage).await
}

pub(super) async fn list_notes_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    user_id: &str,
) -> Result<Vec<Note>, NoteError> {
    Ok(sqlx::query_as::<_, Note>(&format!(
        r#"
        SELECT * FROM {table_name}
        WHERE user_id = $1
        ORDER BY created_at DESC, sequence_number DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub(super) async fn insert_note_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    note: Note,
) -> Result<Note, NoteError> {
    Ok(sqlx::query_as::<_, Note>(&format!(
        r#"
        INSERT INTO {table_name} (id, user_id, title, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#
    ))
    .bind(&note.id)
    .bind(&note.user_id)
    .bind(&note.title)
    .bind(&note.content)
    .bind(note.created_at)
    .bind(note.updated_at)
    .fetch_one(pool)
    .await?)
}

pub(super) async fn update_note_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    user_id: &str,
    note_id: &str,
    changes: &NoteChanges,
    now: DateTime<Utc>,
) -> Result<Option<Note>, NoteError> {
    Ok(sqlx::query_as::<_, Note>(&format!(
        r#"
        UPDATE {table_name}
        SET title = COALESCE($1, title), content = COALESCE($2, content), updated_at = $3
        WHERE id = $4 AND user_id = $5
        RETURNING *
        "#
    ))
    .bind(&changes.title)
    .bind(&changes.content)
    .bind(now)
    .bind(note_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

pub(super) async fn delete_note_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    user_id: &str,
    note_id: &str,
) -> Result<bool, NoteError> {
    let result = sqlx::query(&format!(
        "DELETE FROM {table_name} WHERE id = $1 AND user_id = $2"
    ))
    .bind(note_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
