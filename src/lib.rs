//! Shuttle Ledger Library
//! # Overview
//!
//! This library keeps the payment ledger of a school-shuttle operator for one
//! academic year (September through June): which student paid which month,
//! what the operator spent, and who still owes money.
//!
//! # Architecture
//!
//! - [`types`] - Entities (School, Student, PaymentRecord, Expense) and errors
//! - [`core`] - Business logic:
//!   - [`core::academic_year`] - Maps month numbers to calendar years
//!   - [`core::ledger`] - Paid/unpaid records, overdue months and debt
//!   - [`core::reports`] - Dashboard, monthly, per-school and overdue views
//!   - [`core::app`] - Application context that persists before it mutates
//! - [`storage`] - Store trait with SQLite and JSON backends, plus migration
//! - [`io`] - CSV output of listings and reports
//! - [`cli`] - Argument parsing and command dispatch
//! - [`logging`] - tracing subscriber setup
//!
//! # Academic Year
//!
//! Months 09-12 belong to the autumn calendar year and 01-06 to the
//! following one. July and August are outside the academic year. A month is
//! overdue once its first day is on or before the first day of the current
//! month and it has no payment record.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod storage;
pub mod types;

pub use core::{AcademicMonth, AppContext, Dataset, PaymentLedger, PaymentState};
pub use storage::{create_store, Store, StoreConfig};
pub use types::{
    Expense, ExpenseCategory, LedgerError, MonthToken, PaymentRecord, PaymentStatus, School,
    Student,
};
