//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `school`: Schools and students
//! - `payment`: Payment records and month tokens
//! - `expense`: Operating expenses and their categories
//! - `error`: Error types for the ledger

pub mod error;
pub mod expense;
pub mod payment;
pub mod school;

pub use error::LedgerError;
pub use expense::{parse_date, Expense, ExpenseCategory, ExpenseId, NewExpense};
pub use payment::{MonthToken, PaymentRecord, PaymentStatus};
pub use school::{NewStudent, School, SchoolId, Student, StudentId, StudentUpdate};
