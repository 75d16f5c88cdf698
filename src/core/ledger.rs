//! School-year payment ledger
//!
//! This module provides the PaymentLedger that records which students have
//! paid for which billing months. A month is paid exactly when a record exists
//! for the `(student, month)` pair; there are no partial payments.
//!
//! # Overdue Months
//!
//! A month is overdue for a student when its resolved first day is on or
//! before the first day of the current month and no record exists. The
//! current month therefore counts as overdue from its first day.
//!
//! # Duplicate Handling
//!
//! At most one record exists per pair. When loading records, the first
//! occurrence of a pair wins and later ones are ignored.

use crate::core::academic_year::AcademicMonth;
use crate::types::{MonthToken, PaymentRecord, Student, StudentId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Payment state of a `(student, month)` pair after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Paid,
    Unpaid,
}

/// Set of paid markers keyed by student and month token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentLedger {
    /// Student id -> month token -> record
    records: HashMap<StudentId, HashMap<String, PaymentRecord>>,
}

impl PaymentLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        PaymentLedger {
            records: HashMap::new(),
        }
    }

    /// Build a ledger from stored records, keeping the first record of each pair
    pub fn from_records(records: impl IntoIterator<Item = PaymentRecord>) -> Self {
        let mut ledger = PaymentLedger::new();
        for record in records {
            ledger
                .records
                .entry(record.student_id.clone())
                .or_default()
                .entry(record.month.clone())
                .or_insert(record);
        }
        ledger
    }

    /// Whether a record exists for the pair
    ///
    /// Malformed month tokens never match.
    pub fn is_paid(&self, student_id: &str, month: &str) -> bool {
        self.records
            .get(student_id)
            .is_some_and(|months| months.contains_key(month))
    }

    /// Get the record for a pair, if paid
    pub fn get(&self, student_id: &str, month: &str) -> Option<&PaymentRecord> {
        self.records.get(student_id)?.get(month)
    }

    /// Flip the payment state of a pair
    ///
    /// Removes the record if present; otherwise inserts a `paid` record whose
    /// amount is `fee`. Applying the same toggle twice restores the previous
    /// state, except that a re-inserted record carries `fee` as its amount.
    ///
    /// # Returns
    ///
    /// The state of the pair after the toggle.
    pub fn toggle(&mut self, student_id: &str, month: &str, fee: Decimal) -> PaymentState {
        if let Some(months) = self.records.get_mut(student_id) {
            if months.remove(month).is_some() {
                if months.is_empty() {
                    self.records.remove(student_id);
                }
                return PaymentState::Unpaid;
            }
        }

        self.records
            .entry(student_id.to_string())
            .or_default()
            .insert(month.to_string(), PaymentRecord::paid(student_id, month, fee));
        PaymentState::Paid
    }

    /// Unpaid academic months whose date has arrived, in academic order
    ///
    /// # Arguments
    ///
    /// * `student_id` - The student to check
    /// * `as_of` - Today's date; fixes both the academic year and the cut-off
    pub fn overdue_months(&self, student_id: &str, as_of: NaiveDate) -> Vec<AcademicMonth> {
        let cutoff = MonthToken::of(as_of).first_day();

        AcademicMonth::ALL
            .into_iter()
            .filter(|month| {
                let token = month.token(as_of);
                token.first_day() <= cutoff && !self.is_paid(student_id, &token.to_string())
            })
            .collect()
    }

    /// Overdue month count times the student's current monthly fee
    pub fn outstanding_debt(&self, student: &Student, as_of: NaiveDate) -> Decimal {
        let months = self.overdue_months(&student.id, as_of).len();
        Decimal::from(months) * student.monthly_fee
    }

    /// Iterate over all records in no particular order
    pub fn records(&self) -> impl Iterator<Item = &PaymentRecord> {
        self.records.values().flat_map(|months| months.values())
    }

    /// All records sorted by month token, then student id
    pub fn sorted_records(&self) -> Vec<&PaymentRecord> {
        let mut records: Vec<&PaymentRecord> = self.records().collect();
        records.sort_by(|a, b| {
            a.month
                .cmp(&b.month)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        records
    }

    /// Records for one month token, sorted by student id
    pub fn records_for_month(&self, month: &str) -> Vec<&PaymentRecord> {
        let mut records: Vec<&PaymentRecord> =
            self.records().filter(|r| r.month == month).collect();
        records.sort_by(|a, b| a.student_id.cmp(&b.student_id));
        records
    }

    /// Sum of all collected amounts
    pub fn total_paid(&self) -> Decimal {
        self.records().map(|r| r.paid_amount).sum()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
