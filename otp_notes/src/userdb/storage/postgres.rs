use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::storage::validate_postgres_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField},
};

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), UserError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT,
            name TEXT,
            google_id TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table_name}_google_id ON {table_name}(google_id)"
    ))
    .execute(pool)
    .await?;

    Ok(())
}

/// Validates that the User table schema matches what we expect
pub(super) async fn validate_user_tables_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), UserError> {
    let expected_columns = vec![
        ("id", "text"),
        ("email", "text"),
        ("password_hash", "text"),
        ("name", "text"),
        ("google_id", "text"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, table_name, &expected_columns, UserError::Storage).await
}

pub(super) async fn get_user_by_field_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    field: &UserSearchField,
) -> Result<Option<User>, UserError> {
    let (column, value) = match field {
        UserSearchField::Id(id) => ("id", id),
        UserSearchField::Email(email) => ("email", email),
        UserSearchField::GoogleId(google_id) => ("google_id", google_id),
    };

    Ok(sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT id, email, password_hash, name, google_id, created_at, updated_at
        FROM {table_name} WHERE {column} = $1
        "#
    ))
    .bind(value)
    .fetch_optional(pool)
    .await?)
}

pub(super) async fn insert_user_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    user: User,
) -> Result<User, UserError> {
    Ok(sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO {table_name} (id, email, password_hash, name, google_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, email, password_hash, name, google_id, created_at, updated_at
        "#
    ))
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(&user.google_id)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(pool)
    .await?)
}

pub(super) async fn link_google_id_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    user_id: &str,
    google_id: &str,
) -> Result<User, UserError> {
    // An already linked account keeps its original id
    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET google_id = $1, updated_at = $2
        WHERE id = $3 AND google_id IS NULL
        "#
    ))
    .bind(google_id)
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    get_user_by_field_postgres(pool, table_name, &UserSearchField::Id(user_id.to_string()))
        .await?
        .ok_or(UserError::NotFound)
}
