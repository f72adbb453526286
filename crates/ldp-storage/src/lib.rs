//! Loco Dev Preview Storage Layer
//!
//! SQLite-backed settings store. The preview itself keeps no durable state;
//! the only persisted values are the host settings (default URL and the
//! http-only restriction).

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
