//! Core business logic module
//!
//! This module contains the ledger components:
//! - `academic_year` - Mapping of academic months to calendar years
//! - `ledger` - Paid markers per student and month, overdue months, debt
//! - `dataset` - In-memory snapshot of all entities
//! - `reports` - Dashboard and report views over a snapshot
//! - `app` - Application context that owns the dataset and its store

pub mod academic_year;
pub mod app;
pub mod dataset;
pub mod ledger;
pub mod reports;

pub use academic_year::{academic_calendar, resolve_month, AcademicMonth};
pub use app::AppContext;
pub use dataset::Dataset;
pub use ledger::{PaymentLedger, PaymentState};
