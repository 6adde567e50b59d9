//! Omnibar Storage Layer
//!
//! SQLite-based persistence backing the location bar: visit history with a
//! full-text index, bookmarks and settings.

mod database;
mod error;
mod migrations;

pub use database::{Database, Setting};
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
