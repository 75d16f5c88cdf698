//! In-memory snapshot of every entity
//!
//! The dataset is owned by the application context and handed read-only to the
//! ledger queries and report builders. It does not enforce referential
//! integrity: a payment whose student was deleted stays in the ledger as an
//! orphan and is skipped by reports that join on students.

use crate::core::ledger::PaymentLedger;
use crate::types::{Expense, School, Student};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub schools: Vec<School>,
    pub students: Vec<Student>,
    pub payments: PaymentLedger,
    pub expenses: Vec<Expense>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn school(&self, id: &str) -> Option<&School> {
        self.schools.iter().find(|s| s.id == id)
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Students enrolled at a school, in insertion order
    pub fn students_of<'a>(&'a self, school_id: &'a str) -> impl Iterator<Item = &'a Student> + 'a {
        self.students.iter().filter(move |s| s.school_id == school_id)
    }

    /// Schools sorted by name
    pub fn schools_by_name(&self) -> Vec<&School> {
        let mut schools: Vec<&School> = self.schools.iter().collect();
        schools.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        schools
    }

    /// Expenses sorted newest first
    pub fn expenses_by_date_desc(&self) -> Vec<&Expense> {
        let mut expenses: Vec<&Expense> = self.expenses.iter().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        expenses
    }

    /// True when no entity of any kind is present
    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
            && self.students.is_empty()
            && self.payments.is_empty()
            && self.expenses.is_empty()
    }
}
