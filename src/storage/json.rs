//! Local JSON document store
//!
//! All entities live in one JSON document with the keys `schools`, `students`,
//! `payments` and `expenses`, matching the blobs the browser dashboard kept in
//! local storage. The whole document is rewritten after every change.
//!
//! A missing file loads as an empty dataset; the file is created on the first
//! write. Changes are applied to a copy of the document and only kept once the
//! file write succeeded.

use crate::core::{Dataset, PaymentLedger};
use crate::storage::{BackendType, Store};
use crate::types::{Expense, LedgerError, PaymentRecord, School, Student};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk document layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub schools: Vec<School>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    document: Document,
}

impl JsonStore {
    /// Open the document at `path`, or start empty if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let document = if path.exists() {
            let contents = fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                Document::default()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            Document::default()
        };

        tracing::debug!(
            path = %path.display(),
            schools = document.schools.len(),
            students = document.students.len(),
            payments = document.payments.len(),
            expenses = document.expenses.len(),
            "loaded JSON document"
        );

        Ok(JsonStore {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy, persist it, then keep it
    fn commit<F>(&mut self, change: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut Document),
    {
        let mut next = self.document.clone();
        change(&mut next);

        let contents = serde_json::to_string_pretty(&next)?;
        fs::write(&self.path, contents)?;

        self.document = next;
        Ok(())
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Dataset, LedgerError> {
        Ok(Dataset {
            schools: self.document.schools.clone(),
            students: self.document.students.clone(),
            payments: PaymentLedger::from_records(self.document.payments.iter().cloned()),
            expenses: self.document.expenses.clone(),
        })
    }

    fn insert_school(&mut self, school: &School) -> Result<(), LedgerError> {
        self.commit(|doc| doc.schools.push(school.clone()))
    }

    fn delete_school(&mut self, id: &str) -> Result<(), LedgerError> {
        self.commit(|doc| doc.schools.retain(|s| s.id != id))
    }

    fn upsert_student(&mut self, student: &Student) -> Result<(), LedgerError> {
        self.commit(|doc| {
            match doc.students.iter_mut().find(|s| s.id == student.id) {
                Some(existing) => *existing = student.clone(),
                None => doc.students.push(student.clone()),
            }
        })
    }

    fn delete_student(&mut self, id: &str) -> Result<(), LedgerError> {
        self.commit(|doc| doc.students.retain(|s| s.id != id))
    }

    fn insert_payment(&mut self, payment: &PaymentRecord) -> Result<(), LedgerError> {
        self.commit(|doc| {
            doc.payments
                .retain(|p| !(p.student_id == payment.student_id && p.month == payment.month));
            doc.payments.push(payment.clone());
        })
    }

    fn delete_payment(&mut self, student_id: &str, month: &str) -> Result<(), LedgerError> {
        self.commit(|doc| {
            doc.payments
                .retain(|p| !(p.student_id == student_id && p.month == month))
        })
    }

    fn insert_expense(&mut self, expense: &Expense) -> Result<(), LedgerError> {
        self.commit(|doc| doc.expenses.insert(0, expense.clone()))
    }

    fn delete_expense(&mut self, id: &str) -> Result<(), LedgerError> {
        self.commit(|doc| doc.expenses.retain(|e| e.id != id))
    }

    /// Append everything with a single document write
    fn import(&mut self, dataset: &Dataset) -> Result<(), LedgerError> {
        self.commit(|doc| {
            doc.schools.extend(dataset.schools.iter().cloned());
            doc.students.extend(dataset.students.iter().cloned());
            doc.payments
                .extend(dataset.payments.sorted_records().into_iter().cloned());
            doc.expenses.extend(dataset.expenses.iter().cloned());
        })
    }

    fn backend(&self) -> BackendType {
        BackendType::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpenseCategory;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn school(id: &str) -> School {
        School {
            id: id.to_string(),
            name: format!("School {}", id),
            location: None,
        }
    }

    fn student(id: &str, fee: i64) -> Student {
        Student {
            id: id.to_string(),
            school_id: "1".to_string(),
            name: "Elif".to_string(),
            parent_name: "Hasan".to_string(),
            phone: "555".to_string(),
            monthly_fee: Decimal::new(fee, 0),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(&dir.path().join("none.json")).unwrap();

        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let mut store = JsonStore::open(&path).unwrap();
        store.insert_school(&school("1")).unwrap();
        store.upsert_student(&student("s1", 1000)).unwrap();
        store
            .insert_payment(&PaymentRecord::paid("s1", "2024-03", Decimal::new(1000, 0)))
            .unwrap();
        store
            .insert_expense(&Expense {
                id: "e1".to_string(),
                category: ExpenseCategory::Inspection,
                description: "Araç muayenesi".to_string(),
                amount: Decimal::new(2750, 0),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            })
            .unwrap();

        let reopened = JsonStore::open(&path).unwrap().load().unwrap();
        assert_eq!(reopened.schools.len(), 1);
        assert_eq!(reopened.students[0].monthly_fee, Decimal::new(1000, 0));
        assert!(reopened.payments.is_paid("s1", "2024-03"));
        assert_eq!(reopened.expenses[0].category, ExpenseCategory::Inspection);
    }

    #[test]
    fn test_money_is_written_as_json_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut store = JsonStore::open(&path).unwrap();

        store.upsert_student(&student("s", 1500)).unwrap();
        store
            .insert_payment(&PaymentRecord::paid("s", "2024-03", Decimal::new(150050, 2)))
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["students"][0]["monthlyFee"].as_f64(), Some(1500.0));
        assert_eq!(value["payments"][0]["paidAmount"].as_f64(), Some(1500.5));

        let reopened = JsonStore::open(&path).unwrap().load().unwrap();
        assert_eq!(
            reopened.payments.get("s", "2024-03").unwrap().paid_amount,
            Decimal::new(15005, 1)
        );
    }

    #[test]
    fn test_upsert_replaces_student() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::open(&dir.path().join("ledger.json")).unwrap();

        store.upsert_student(&student("s1", 1000)).unwrap();
        store.upsert_student(&student("s1", 1200)).unwrap();

        let dataset = store.load().unwrap();
        assert_eq!(dataset.students.len(), 1);
        assert_eq!(dataset.students[0].monthly_fee, Decimal::new(1200, 0));
    }

    #[test]
    fn test_delete_payment_removes_only_that_pair() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::open(&dir.path().join("ledger.json")).unwrap();

        store
            .insert_payment(&PaymentRecord::paid("s1", "2024-03", Decimal::ONE))
            .unwrap();
        store
            .insert_payment(&PaymentRecord::paid("s1", "2024-04", Decimal::ONE))
            .unwrap();
        store.delete_payment("s1", "2024-03").unwrap();

        let dataset = store.load().unwrap();
        assert!(!dataset.payments.is_paid("s1", "2024-03"));
        assert!(dataset.payments.is_paid("s1", "2024-04"));
    }

    #[test]
    fn test_reads_browser_document() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "schools": [{{"id": "1700000000000", "name": "Cumhuriyet", "location": ""}}],
                "students": [{{"id": "1700000000001", "schoolId": "1700000000000", "name": "Can",
                              "parentName": "Deniz", "phone": "0555", "monthlyFee": 1750}}],
                "payments": [{{"studentId": "1700000000001", "month": "2024-02",
                              "status": "paid", "paidAmount": 1750}}],
                "expenses": [{{"id": "9", "category": "Yakıt", "description": "Shell",
                              "amount": 1200.5, "date": "2024-02-11"}}]
            }}"#
        )
        .unwrap();
        file.flush().unwrap();

        let dataset = JsonStore::open(file.path()).unwrap().load().unwrap();
        assert_eq!(dataset.students[0].monthly_fee, Decimal::new(1750, 0));
        assert_eq!(dataset.expenses[0].amount, Decimal::new(12005, 1));
        assert!(dataset.payments.is_paid("1700000000001", "2024-02"));
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        file.flush().unwrap();

        let result = JsonStore::open(file.path());
        assert!(matches!(result, Err(LedgerError::JsonError { .. })));
    }

    #[test]
    fn test_failed_write_keeps_previous_document() {
        let dir = tempdir().unwrap();
        // a directory cannot be written as a file
        let mut store = JsonStore::open(dir.path()).unwrap_or_else(|_| JsonStore {
            path: dir.path().to_path_buf(),
            document: Document::default(),
        });

        let result = store.insert_school(&school("1"));

        assert!(matches!(result, Err(LedgerError::IoError { .. })));
        assert!(store.load().unwrap().schools.is_empty());
    }
}
