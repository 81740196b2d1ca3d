// Adapters layer: concrete implementations for external systems (storage, database).

pub mod database;
pub mod storage;

pub use database::SqliteConnectionProvider;
pub use storage::LocalStorage;
