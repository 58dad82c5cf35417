mod cache_store;
mod data_store;
mod errors;
mod schema_validation;
mod types;

pub use cache_store::{CacheStore, SharedCacheStore, connect_cache_store};
pub use data_store::{DataStore, connect_data_store};
pub use errors::StorageError;
pub use types::CacheData;

pub(crate) use schema_validation::{validate_postgres_table_schema, validate_sqlite_table_schema};
