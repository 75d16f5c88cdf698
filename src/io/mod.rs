//! I/O module
//!
//! Handles CSV output of listings and reports.
//!
//! # Components
//!
//! - `csv_format` - CSV serialization of every listing and report view

pub mod csv_format;

pub use csv_format::{
    write_dashboard_csv, write_expenses_csv, write_grid_csv, write_month_detail_csv,
    write_monthly_csv, write_overdue_csv, write_school_report_csv, write_schools_csv,
    write_students_csv,
};
