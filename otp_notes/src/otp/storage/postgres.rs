use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::otp::{errors::OtpError, types::OtpCode};
use crate::storage::validate_postgres_table_schema;

pub(super) async fn create_tables_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), OtpError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            code TEXT NOT NULL,
            expires_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table_name}_email ON {table_name}(email)"
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table_name}_expires_at ON {table_name}(expires_at)"
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn validate_otp_tables_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), OtpError> {
    let expected_columns = vec![
        ("id", "text"),
        ("email", "text"),
        ("code", "text"),
        ("expires_at", "timestamp with time zone"),
        ("created_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, table_name, &expected_columns, OtpError::Storage).await
}

pub(super) async fn insert_otp_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    otp: &OtpCode,
) -> Result<(), OtpError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, email, code, expires_at, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#
    ))
    .bind(&otp.id)
    .bind(&otp.email)
    .bind(&otp.code)
    .bind(otp.expires_at)
    .bind(otp.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn find_match_otp_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    email: &str,
    code: &str,
    now: DateTime<Utc>,
) -> Result<Option<OtpCode>, OtpError> {
    Ok(sqlx::query_as::<_, OtpCode>(&format!(
        r#"
        SELECT id, email, code, expires_at, created_at FROM {table_name}
        WHERE email = $1 AND code = $2
        ORDER BY (expires_at > $3) DESC, created_at DESC
        LIMIT 1
        "#
    ))
    .bind(email)
    .bind(code)
    .bind(now)
    .fetch_optional(pool)
    .await?)
}

pub(super) async fn delete_otp_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: &str,
) -> Result<bool, OtpError> {
    let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn purge_expired_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    now: DateTime<Utc>,
) -> Result<u64, OtpError> {
    let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE expires_at <= $1"))
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
