use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::otp::{errors::OtpError, types::OtpCode};
use crate::storage::validate_sqlite_table_schema;

pub(super) async fn create_tables_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), OtpError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL,
            code TEXT NOT NULL,
            expires_at TIMESTAMP NOT NULL,
            created_at TIMESTAMP NOT NULL
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

pub(super) async fn validate_otp_tables_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), OtpError> {
    let expected_columns = vec![
        ("id", "TEXT"),
        ("email", "TEXT"),
        ("code", "TEXT"),
        ("expires_at", "TIMESTAMP"),
        ("created_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(pool, table_name, &expected_columns, OtpError::Storage).await
}

pub(super) async fn insert_otp_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    otp: &OtpCode,
) -> Result<(), OtpError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, email, code, expires_at, created_at)
        VALUES (?, ?, ?, ?, ?)
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

pub(super) async fn find_match_otp_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    email: &str,
    code: &str,
    now: DateTime<Utc>,
) -> Result<Option<OtpCode>, OtpError> {
    Ok(sqlx::query_as::<_, OtpCode>(&format!(
        r#"
        SELECT id, email, code, expires_at, created_at FROM {table_name}
        WHERE email = ? AND code = ?
        ORDER BY (expires_at > ?) DESC, created_at DESC
        LIMIT 1
        "#
    ))
    .bind(email)
    .bind(code)
    .bind(now)
    .fetch_optional(pool)
    .await?)
}

pub(super) async fn delete_otp_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    id: &str,
) -> Result<bool, OtpError> {
    let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE id = ?"))
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn purge_expired_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    now: DateTime<Utc>,
) -> Result<u64, OtpError> {
    let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE expires_at <= ?"))
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
