//! Persistence backends
//!
//! This module defines the Store trait, the boundary between the in-memory
//! application context and durable storage. Two interchangeable backends are
//! provided and selected at runtime:
//!
//! - `sqlite` - relational row store, one row per entity
//! - `json` - a single serialized document rewritten on every change, used as
//!   the fallback when no database is configured
//!
//! Every mutating call returns a `Result`; the application context applies a
//! change in memory only after the store accepted it.

use crate::core::Dataset;
use crate::types::{Expense, LedgerError, PaymentRecord, School, Student};
use std::fmt;
use std::path::PathBuf;

pub mod json;
pub mod migrate;
pub mod sqlite;

pub use json::JsonStore;
pub use migrate::{migrate, MigrationSummary};
pub use sqlite::SqliteStore;

/// Available storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Json,
    Sqlite,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendType::Json => f.write_str("json"),
            BackendType::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Durable storage for schools, students, payments and expenses
///
/// Implementations key schools, students and expenses by id and payments by
/// `(student_id, month)`. Deleting a missing row is not an error.
pub trait Store {
    /// Read every entity
    fn load(&self) -> Result<Dataset, LedgerError>;

    fn insert_school(&mut self, school: &School) -> Result<(), LedgerError>;

    fn delete_school(&mut self, id: &str) -> Result<(), LedgerError>;

    /// Insert a student or replace the one with the same id
    fn upsert_student(&mut self, student: &Student) -> Result<(), LedgerError>;

    fn delete_student(&mut self, id: &str) -> Result<(), LedgerError>;

    fn insert_payment(&mut self, payment: &PaymentRecord) -> Result<(), LedgerError>;

    fn delete_payment(&mut self, student_id: &str, month: &str) -> Result<(), LedgerError>;

    fn insert_expense(&mut self, expense: &Expense) -> Result<(), LedgerError>;

    fn delete_expense(&mut self, id: &str) -> Result<(), LedgerError>;

    /// Add every entity of `dataset` as one unit: either all of it is stored
    /// or none of it is
    fn import(&mut self, dataset: &Dataset) -> Result<(), LedgerError>;

    /// Which backend this is
    fn backend(&self) -> BackendType;
}

/// Storage configuration
///
/// The row store is used whenever a database path is configured; otherwise
/// data lives in the JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub json_path: PathBuf,
    pub sqlite_path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn backend(&self) -> BackendType {
        if self.sqlite_path.is_some() {
            BackendType::Sqlite
        } else {
            BackendType::Json
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            json_path: PathBuf::from("ledger.json"),
            sqlite_path: None,
        }
    }
}

/// Open the store selected by `config`
///
/// # Errors
///
/// Returns an error if the selected backend cannot be opened.
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn Store>, LedgerError> {
    match &config.sqlite_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "opening sqlite store");
            Ok(Box::new(SqliteStore::open(path)?))
        }
        None => {
            tracing::warn!(
                path = %config.json_path.display(),
                "no database configured, using local JSON store"
            );
            Ok(Box::new(JsonStore::open(&config.json_path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_uses_json() {
        assert_eq!(StoreConfig::default().backend(), BackendType::Json);
    }

    #[test]
    fn test_create_store_selects_backend() {
        let dir = tempdir().unwrap();

        let json = create_store(&StoreConfig {
            json_path: dir.path().join("ledger.json"),
            sqlite_path: None,
        })
        .unwrap();
        assert_eq!(json.backend(), BackendType::Json);

        let sqlite = create_store(&StoreConfig {
            json_path: dir.path().join("ledger.json"),
            sqlite_path: Some(dir.path().join("ledger.db")),
        })
        .unwrap();
        assert_eq!(sqlite.backend(), BackendType::Sqlite);
    }
}
