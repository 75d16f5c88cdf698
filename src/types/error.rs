//! Error types for the shuttle ledger
//!
//! The ledger and the academic-year resolver are total and never fail. Errors
//! only arise at the edges: persistence, input parsing and lookups performed
//! by the application context on behalf of the CLI.
//!
//! # Error Categories
//!
//! - **Storage Errors**: file I/O, JSON encoding, SQLite failures
//! - **Lookup Errors**: school, student or expense not found
//! - **Input Errors**: malformed months, dates, amounts or categories
//! - **Migration Errors**: target store already holds data

use thiserror::Error;

/// Main error type for the shuttle ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// I/O error while reading or writing the local store
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// The JSON document could not be encoded or decoded
    #[error("JSON error: {message}")]
    JsonError {
        /// Description of the serialization failure
        message: String,
    },

    /// The relational store rejected an operation
    #[error("Database error: {message}")]
    DatabaseError {
        /// Description of the database failure
        message: String,
    },

    /// CSV output could not be written
    #[error("CSV error: {message}")]
    CsvError {
        /// Description of the CSV failure
        message: String,
    },

    /// No school with the given identifier
    #[error("School {id} not found")]
    SchoolNotFound {
        /// The missing school identifier
        id: String,
    },

    /// No student with the given identifier
    #[error("Student {id} not found")]
    StudentNotFound {
        /// The missing student identifier
        id: String,
    },

    /// No expense with the given identifier
    #[error("Expense {id} not found")]
    ExpenseNotFound {
        /// The missing expense identifier
        id: String,
    },

    /// A month argument is neither an academic month number nor a `YYYY-MM` token
    #[error("Invalid month '{value}': expected 01-06, 09-12 or YYYY-MM")]
    InvalidMonth {
        /// The rejected input
        value: String,
    },

    /// A date argument is not `YYYY-MM-DD`
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        value: String,
    },

    /// Amount is malformed or not strictly positive where required
    #[error("Invalid amount '{value}'")]
    InvalidAmount {
        /// The rejected amount, as text
        value: String,
    },

    /// Unknown expense category label
    #[error("Unknown expense category '{value}'")]
    InvalidCategory {
        /// The rejected label
        value: String,
    },

    /// Migration was requested without a database to migrate into
    #[error("No database configured: set --sqlite or LEDGER_SQLITE")]
    DatabaseNotConfigured,

    /// Migration refused because the target already contains records
    #[error("Migration target ({backend}) already contains data")]
    TargetNotEmpty {
        /// Name of the target backend
        backend: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::JsonError {
            message: error.to_string(),
        }
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(error: rusqlite::Error) -> Self {
        LedgerError::DatabaseError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        LedgerError::CsvError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a SchoolNotFound error
    pub fn school_not_found(id: &str) -> Self {
        LedgerError::SchoolNotFound { id: id.to_string() }
    }

    /// Create a StudentNotFound error
    pub fn student_not_found(id: &str) -> Self {
        LedgerError::StudentNotFound { id: id.to_string() }
    }

    /// Create an ExpenseNotFound error
    pub fn expense_not_found(id: &str) -> Self {
        LedgerError::ExpenseNotFound { id: id.to_string() }
    }

    /// Create an InvalidMonth error
    pub fn invalid_month(value: &str) -> Self {
        LedgerError::InvalidMonth {
            value: value.to_string(),
        }
    }

    /// Create an InvalidDate error
    pub fn invalid_date(value: &str) -> Self {
        LedgerError::InvalidDate {
            value: value.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(value: &str) -> Self {
        LedgerError::InvalidAmount {
            value: value.to_string(),
        }
    }

    /// Create an InvalidCategory error
    pub fn invalid_category(value: &str) -> Self {
        LedgerError::InvalidCategory {
            value: value.to_string(),
        }
    }

    /// Create a TargetNotEmpty error
    pub fn target_not_empty(backend: &str) -> Self {
        LedgerError::TargetNotEmpty {
            backend: backend.to_string(),
        }
    }
}
