//! Application context
//!
//! This module provides the AppContext that owns the in-memory dataset and the
//! store behind it. Every mutation goes through the context:
//!
//! 1. validate against the current snapshot
//! 2. persist through the store
//! 3. apply the same change in memory
//!
//! A store failure is returned before step 3, so memory never runs ahead of
//! storage. Multi-step operations (school deletion with its students) are not
//! atomic: a failure part way leaves the steps already taken in place, in
//! both memory and storage.

use crate::core::dataset::Dataset;
use crate::core::ledger::PaymentState;
use crate::storage::{BackendType, Store};
use crate::types::{
    Expense, LedgerError, NewExpense, NewStudent, PaymentRecord, School, Student, StudentUpdate,
};

pub struct AppContext {
    dataset: Dataset,
    store: Box<dyn Store>,
}

impl AppContext {
    /// Load the dataset from `store`
    pub fn open(store: Box<dyn Store>) -> Result<Self, LedgerError> {
        let dataset = store.load()?;
        tracing::debug!(
            backend = %store.backend(),
            schools = dataset.schools.len(),
            students = dataset.students.len(),
            payments = dataset.payments.len(),
            expenses = dataset.expenses.len(),
            "application context loaded"
        );
        Ok(AppContext { dataset, store })
    }

    /// Read-only snapshot for queries and reports
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn backend(&self) -> BackendType {
        self.store.backend()
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn add_school(&mut self, name: &str, location: Option<String>) -> Result<School, LedgerError> {
        let school = School::new(name.trim(), location);
        self.store.insert_school(&school)?;
        self.dataset.schools.push(school.clone());
        tracing::info!(school_id = %school.id, name = %school.name, "school added");
        Ok(school)
    }

    /// Delete a school and then each of its students
    ///
    /// Payment records of the removed students are kept.
    ///
    /// # Returns
    ///
    /// The number of students removed with the school.
    pub fn delete_school(&mut self, id: &str) -> Result<usize, LedgerError> {
        if self.dataset.school(id).is_none() {
            return Err(LedgerError::school_not_found(id));
        }

        self.store.delete_school(id)?;
        self.dataset.schools.retain(|s| s.id != id);

        let student_ids: Vec<String> = self
            .dataset
            .students_of(id)
            .map(|s| s.id.clone())
            .collect();
        for student_id in &student_ids {
            self.delete_student(student_id)?;
        }

        tracing::info!(school_id = %id, students = student_ids.len(), "school deleted");
        Ok(student_ids.len())
    }

    pub fn add_student(&mut self, new: NewStudent) -> Result<Student, LedgerError> {
        if self.dataset.school(&new.school_id).is_none() {
            return Err(LedgerError::school_not_found(&new.school_id));
        }
        if new.monthly_fee < rust_decimal::Decimal::ZERO {
            return Err(LedgerError::invalid_amount(&new.monthly_fee.to_string()));
        }

        let student = new.into_student();
        self.store.upsert_student(&student)?;
        self.dataset.students.push(student.clone());
        tracing::info!(student_id = %student.id, school_id = %student.school_id, "student added");
        Ok(student)
    }

    pub fn update_student(&mut self, id: &str, update: &StudentUpdate) -> Result<Student, LedgerError> {
        let current = self
            .dataset
            .student(id)
            .ok_or_else(|| LedgerError::student_not_found(id))?;
        if let Some(school_id) = &update.school_id {
            if self.dataset.school(school_id).is_none() {
                return Err(LedgerError::school_not_found(school_id));
            }
        }
        if let Some(fee) = update.monthly_fee {
            if fee < rust_decimal::Decimal::ZERO {
                return Err(LedgerError::invalid_amount(&fee.to_string()));
            }
        }

        let updated = update.apply(current);
        self.store.upsert_student(&updated)?;
        if let Some(slot) = self.dataset.students.iter_mut().find(|s| s.id == id) {
            *slot = updated.clone();
        }
        tracing::info!(student_id = %id, "student updated");
        Ok(updated)
    }

    /// Delete a student; their payment records stay as orphans
    pub fn delete_student(&mut self, id: &str) -> Result<(), LedgerError> {
        if self.dataset.student(id).is_none() {
            return Err(LedgerError::student_not_found(id));
        }

        self.store.delete_student(id)?;
        self.dataset.students.retain(|s| s.id != id);
        tracing::info!(student_id = %id, "student deleted");
        Ok(())
    }

    /// Flip a student's payment for one month, charging their current fee
    pub fn toggle_payment(&mut self, student_id: &str, month: &str) -> Result<PaymentState, LedgerError> {
        let fee = self
            .dataset
            .student(student_id)
            .map(|s| s.monthly_fee)
            .ok_or_else(|| LedgerError::student_not_found(student_id))?;

        if self.dataset.payments.is_paid(student_id, month) {
            self.store.delete_payment(student_id, month)?;
        } else {
            self.store
                .insert_payment(&PaymentRecord::paid(student_id, month, fee))?;
        }

        let state = self.dataset.payments.toggle(student_id, month, fee);
        tracing::info!(student_id = %student_id, month = %month, state = ?state, "payment toggled");
        Ok(state)
    }

    pub fn add_expense(&mut self, new: NewExpense) -> Result<Expense, LedgerError> {
        let expense = new.into_expense()?;
        self.store.insert_expense(&expense)?;
        self.dataset.expenses.insert(0, expense.clone());
        tracing::info!(
            expense_id = %expense.id,
            category = %expense.category,
            amount = %expense.amount,
            "expense added"
        );
        Ok(expense)
    }

    pub fn delete_expense(&mut self, id: &str) -> Result<(), LedgerError> {
        if self.dataset.expense(id).is_none() {
            return Err(LedgerError::expense_not_found(id));
        }

        self.store.delete_expense(id)?;
        self.dataset.expenses.retain(|e| e.id != id);
        tracing::info!(expense_id = %id, "expense deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Dataset;
    use crate::storage::SqliteStore;
    use crate::types::ExpenseCategory;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal::Decimal;

    /// Store that serves a fixed dataset and rejects every write
    #[derive(Default)]
    struct FailingStore {
        dataset: Dataset,
    }

    impl Store for FailingStore {
        fn load(&self) -> Result<Dataset, LedgerError> {
            Ok(self.dataset.clone())
        }
        fn insert_school(&mut self, _: &School) -> Result<(), LedgerError> {
            Err(LedgerError::IoError { message: "offline".to_string() })
        }
        fn delete_school(&mut self, _: &str) -> Result<(), LedgerError> {
            Err(LedgerError::IoError { message: "offline".to_string() })
        }
        fn upsert_student(&mut self, _: &Student) -> Result<(), LedgerError> {
            Err(LedgerError::IoError { message: "offline".to_string() })
        }
        fn delete_student(&mut self, _: &str) -> Result<(), LedgerError> {
            Err(LedgerError::IoError { message: "offline".to_string() })
        }
        fn insert_payment(&mut self, _: &PaymentRecord) -> Result<(), LedgerError> {
            Err(LedgerError::IoError { message: "offline".to_string() })
        }
        fn delete_payment(&mut self, _: &str, _: &str) -> Result<(), LedgerError> {
            Err(LedgerError::IoError { message: "offline".to_string() })
        }
        fn insert_expense(&mut self, _: &Expense) -> Result<(), LedgerError> {
            Err(LedgerError::IoError { message: "offline".to_string() })
        }
        fn delete_expense(&mut self, _: &str) -> Result<(), LedgerError> {
            Err(LedgerError::IoError { message: "offline".to_string() })
        }
        fn import(&mut self, _: &Dataset) -> Result<(), LedgerError> {
            Err(LedgerError::IoError { message: "offline".to_string() })
        }
        fn backend(&self) -> BackendType {
            BackendType::Json
        }
    }

    fn context() -> AppContext {
        AppContext::open(Box::new(SqliteStore::open_in_memory().unwrap())).unwrap()
    }

    fn new_student(school_id: &str, fee: i64) -> NewStudent {
        NewStudent {
            school_id: school_id.to_string(),
            name: "Defne".to_string(),
            parent_name: "Burak".to_string(),
            phone: "0505".to_string(),
            monthly_fee: Decimal::new(fee, 0),
        }
    }

    #[test]
    fn test_toggle_payment_scenario() {
        let mut app = context();
        let school = app.add_school("Barbaros", None).unwrap();
        let student = app.add_student(new_student(&school.id, 1500)).unwrap();

        let state = app.toggle_payment(&student.id, "2024-03").unwrap();

        assert_eq!(state, PaymentState::Paid);
        let stored = app.store().load().unwrap();
        assert_eq!(stored.payments.len(), 1);
        let record = stored.payments.get(&student.id, "2024-03").unwrap();
        assert_eq!(record.paid_amount, Decimal::new(1500, 0));

        let state = app.toggle_payment(&student.id, "2024-03").unwrap();
        assert_eq!(state, PaymentState::Unpaid);
        assert!(app.dataset().payments.is_empty());
        assert!(app.store().load().unwrap().payments.is_empty());
    }

    #[test]
    fn test_toggle_unknown_student() {
        let mut app = context();
        let result = app.toggle_payment("nobody", "2024-03");
        assert_eq!(result, Err(LedgerError::student_not_found("nobody")));
    }

    #[test]
    fn test_add_student_requires_school() {
        let mut app = context();
        let result = app.add_student(new_student("missing", 1000));
        assert_eq!(result, Err(LedgerError::school_not_found("missing")));
    }

    #[test]
    fn test_delete_school_cascades_to_students_but_keeps_payments() {
        let mut app = context();
        let keep = app.add_school("Keep", None).unwrap();
        let drop = app.add_school("Drop", None).unwrap();
        let kept = app.add_student(new_student(&keep.id, 1000)).unwrap();
        let gone = app.add_student(new_student(&drop.id, 1000)).unwrap();
        app.toggle_payment(&gone.id, "2024-01").unwrap();

        let removed = app.delete_school(&drop.id).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(app.dataset().students.len(), 1);
        assert_eq!(app.dataset().students[0].id, kept.id);
        assert!(app.dataset().payments.is_paid(&gone.id, "2024-01"));
        assert_eq!(app.store().load().unwrap(), *app.dataset());
    }

    #[test]
    fn test_update_student_persists() {
        let mut app = context();
        let school = app.add_school("Barbaros", None).unwrap();
        let student = app.add_student(new_student(&school.id, 1000)).unwrap();

        let update = StudentUpdate {
            monthly_fee: Some(Decimal::new(1250, 0)),
            phone: Some("0506".to_string()),
            ..Default::default()
        };
        let updated = app.update_student(&student.id, &update).unwrap();

        assert_eq!(updated.monthly_fee, Decimal::new(1250, 0));
        assert_eq!(app.dataset().students[0].phone, "0506");
        assert_eq!(app.store().load().unwrap().students[0].phone, "0506");
    }

    #[test]
    fn test_expense_lifecycle() {
        let mut app = context();
        let expense = app
            .add_expense(NewExpense {
                category: ExpenseCategory::Fuel,
                description: "Opet".to_string(),
                amount: Decimal::new(2000, 0),
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            })
            .unwrap();
        assert_eq!(app.dataset().expenses.len(), 1);

        app.delete_expense(&expense.id).unwrap();
        assert!(app.dataset().expenses.is_empty());
        assert_eq!(
            app.delete_expense(&expense.id),
            Err(LedgerError::expense_not_found(&expense.id))
        );
    }

    #[test]
    fn test_store_failure_leaves_memory_untouched() {
        let mut app = AppContext::open(Box::new(FailingStore::default())).unwrap();

        let result = app.add_school("Offline", None);

        assert!(matches!(result, Err(LedgerError::IoError { .. })));
        assert!(app.dataset().is_empty());
    }

    /// Context over a failing store seeded with one school, one student
    /// paid for September, and one expense
    fn offline_context() -> AppContext {
        let mut seeded = context();
        let school = seeded.add_school("Barbaros", None).unwrap();
        let student = seeded.add_student(new_student(&school.id, 1000)).unwrap();
        seeded.toggle_payment(&student.id, "2023-09").unwrap();
        seeded
            .add_expense(NewExpense {
                category: ExpenseCategory::Insurance,
                description: "Trafik sigortası".to_string(),
                amount: Decimal::new(5000, 0),
                date: NaiveDate::from_ymd_opt(2023, 9, 10).unwrap(),
            })
            .unwrap();

        AppContext::open(Box::new(FailingStore {
            dataset: seeded.dataset().clone(),
        }))
        .unwrap()
    }

    #[rstest]
    #[case::mark_paid("2023-10")]
    #[case::mark_unpaid("2023-09")]
    fn test_failed_toggle_leaves_ledger_untouched(#[case] month: &str) {
        let mut app = offline_context();
        let before = app.dataset().clone();
        let student_id = before.students[0].id.clone();

        let result = app.toggle_payment(&student_id, month);

        assert!(matches!(result, Err(LedgerError::IoError { .. })));
        assert_eq!(*app.dataset(), before);
    }

    #[test]
    fn test_failed_delete_student_keeps_student() {
        let mut app = offline_context();
        let before = app.dataset().clone();

        let result = app.delete_student(&before.students[0].id);

        assert!(matches!(result, Err(LedgerError::IoError { .. })));
        assert_eq!(*app.dataset(), before);
    }

    #[test]
    fn test_failed_expense_changes_leave_expenses_untouched() {
        let mut app = offline_context();
        let before = app.dataset().clone();

        let added = app.add_expense(NewExpense {
            category: ExpenseCategory::Fuel,
            description: "Opet".to_string(),
            amount: Decimal::new(900, 0),
            date: NaiveDate::from_ymd_opt(2023, 9, 12).unwrap(),
        });
        let deleted = app.delete_expense(&before.expenses[0].id);

        assert!(matches!(added, Err(LedgerError::IoError { .. })));
        assert!(matches!(deleted, Err(LedgerError::IoError { .. })));
        assert_eq!(*app.dataset(), before);
    }
}
