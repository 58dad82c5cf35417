use sqlx::{PgPool, SqlitePool};

use crate::config::DataStoreKind;

/// Pooled connection shared by the user, OTP and notes stores
///
/// Each store asks for the pool of its own backend and runs the matching
/// dialect of its queries.
pub trait DataStore: Send + Sync {
    fn kind(&self) -> DataStoreKind;

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        None
    }

    fn as_postgres(&self) -> Option<&PgPool> {
        None
    }
}

#[derive(Clone, Debug)]
pub(super) struct SqliteDataStore(pub(super) SqlitePool);

#[derive(Clone, Debug)]
pub(super) struct PostgresDataStore(pub(super) PgPool);

impl DataStore for SqliteDataStore {
    fn kind(&self) -> DataStoreKind {
        DataStoreKind::Sqlite
    }

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        Some(&self.0)
    }
}

impl DataStore for PostgresDataStore {
    fn kind(&self) -> DataStoreKind {
        DataStoreKind::Postgres
    }

    fn as_postgres(&self) -> Option<&PgPool> {
        Some(&self.0)
    }
}
