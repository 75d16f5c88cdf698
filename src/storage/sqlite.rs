//! SQLite row store
//!
//! One table per entity. Money is stored as decimal text and dates as
//! `YYYY-MM-DD` text so values round-trip exactly. Payments are keyed by
//! `(student_id, month)`. Expenses load newest first, like the JSON document.

use crate::core::{Dataset, PaymentLedger};
use crate::storage::{BackendType, Store};
use crate::types::{
    Expense, ExpenseCategory, LedgerError, PaymentRecord, PaymentStatus, School, Student,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// In-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self, LedgerError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, LedgerError> {
        setup_schema(&conn)?;
        Ok(SqliteStore { conn })
    }
}

fn setup_schema(conn: &Connection) -> Result<(), LedgerError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schools (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            location TEXT
        );
        CREATE TABLE IF NOT EXISTS students (
            id TEXT PRIMARY KEY,
            school_id TEXT NOT NULL,
            name TEXT NOT NULL,
            parent_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            monthly_fee TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS payments (
            student_id TEXT NOT NULL,
            month TEXT NOT NULL,
            status TEXT NOT NULL,
            paid_amount TEXT NOT NULL,
            PRIMARY KEY (student_id, month)
        );
        CREATE TABLE IF NOT EXISTS expenses (
            id TEXT PRIMARY KEY,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            date TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_students_school ON students(school_id);
        CREATE INDEX IF NOT EXISTS idx_payments_month ON payments(month);",
    )?;
    Ok(())
}

/// Convert a text column into a typed value, reporting the column on failure
fn parse_column<T, F>(column: &str, value: &str, parse: F) -> Result<T, LedgerError>
where
    F: FnOnce(&str) -> Option<T>,
{
    parse(value).ok_or_else(|| LedgerError::DatabaseError {
        message: format!("invalid {} value '{}'", column, value),
    })
}

fn parse_decimal(column: &str, value: &str) -> Result<Decimal, LedgerError> {
    parse_column(column, value, |v| Decimal::from_str(v).ok())
}

fn insert_school_row(conn: &Connection, school: &School) -> Result<(), LedgerError> {
    conn.execute(
        "INSERT INTO schools (id, name, location) VALUES (?1, ?2, ?3)",
        params![school.id, school.name, school.location],
    )?;
    Ok(())
}

fn upsert_student_row(conn: &Connection, student: &Student) -> Result<(), LedgerError> {
    conn.execute(
        "INSERT INTO students (id, school_id, name, parent_name, phone, monthly_fee)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            school_id = excluded.school_id,
            name = excluded.name,
            parent_name = excluded.parent_name,
            phone = excluded.phone,
            monthly_fee = excluded.monthly_fee",
        params![
            student.id,
            student.school_id,
            student.name,
            student.parent_name,
            student.phone,
            student.monthly_fee.to_string()
        ],
    )?;
    Ok(())
}

fn insert_payment_row(conn: &Connection, payment: &PaymentRecord) -> Result<(), LedgerError> {
    conn.execute(
        "INSERT OR REPLACE INTO payments (student_id, month, status, paid_amount)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            payment.student_id,
            payment.month,
            payment.status.as_str(),
            payment.paid_amount.to_string()
        ],
    )?;
    Ok(())
}

fn insert_expense_row(conn: &Connection, expense: &Expense) -> Result<(), LedgerError> {
    conn.execute(
        "INSERT INTO expenses (id, category, description, amount, date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            expense.id,
            expense.category.label(),
            expense.description,
            expense.amount.to_string(),
            expense.date.format("%Y-%m-%d").to_string()
        ],
    )?;
    Ok(())
}

impl Store for SqliteStore {
    fn load(&self) -> Result<Dataset, LedgerError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, location FROM schools ORDER BY rowid")?;
        let schools = stmt
            .query_map([], |row| {
                Ok(School {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    location: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT id, school_id, name, parent_name, phone, monthly_fee
             FROM students ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let students = rows
            .into_iter()
            .map(|(id, school_id, name, parent_name, phone, fee)| {
                Ok(Student {
                    id,
                    school_id,
                    name,
                    parent_name,
                    phone,
                    monthly_fee: parse_decimal("monthly_fee", &fee)?,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT student_id, month, status, paid_amount FROM payments ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let payments = rows
            .into_iter()
            .map(|(student_id, month, status, amount)| {
                Ok(PaymentRecord {
                    student_id,
                    month,
                    status: parse_column("status", &status, |v| match v {
                        "paid" => Some(PaymentStatus::Paid),
                        "unpaid" => Some(PaymentStatus::Unpaid),
                        _ => None,
                    })?,
                    paid_amount: parse_decimal("paid_amount", &amount)?,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT id, category, description, amount, date FROM expenses ORDER BY rowid DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let expenses = rows
            .into_iter()
            .map(|(id, category, description, amount, date)| {
                Ok(Expense {
                    id,
                    category: parse_column("category", &category, |v| {
                        ExpenseCategory::from_str(v).ok()
                    })?,
                    description,
                    amount: parse_decimal("amount", &amount)?,
                    date: parse_column("date", &date, |v| {
                        NaiveDate::parse_from_str(v, "%Y-%m-%d").ok()
                    })?,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(Dataset {
            schools,
            students,
            payments: PaymentLedger::from_records(payments),
            expenses,
        })
    }

    fn insert_school(&mut self, school: &School) -> Result<(), LedgerError> {
        insert_school_row(&self.conn, school)
    }

    fn delete_school(&mut self, id: &str) -> Result<(), LedgerError> {
        self.conn
            .execute("DELETE FROM schools WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn upsert_student(&mut self, student: &Student) -> Result<(), LedgerError> {
        upsert_student_row(&self.conn, student)
    }

    fn delete_student(&mut self, id: &str) -> Result<(), LedgerError> {
        self.conn
            .execute("DELETE FROM students WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn insert_payment(&mut self, payment: &PaymentRecord) -> Result<(), LedgerError> {
        insert_payment_row(&self.conn, payment)
    }

    fn delete_payment(&mut self, student_id: &str, month: &str) -> Result<(), LedgerError> {
        self.conn.execute(
            "DELETE FROM payments WHERE student_id = ?1 AND month = ?2",
            params![student_id, month],
        )?;
        Ok(())
    }

    fn insert_expense(&mut self, expense: &Expense) -> Result<(), LedgerError> {
        insert_expense_row(&self.conn, expense)
    }

    fn delete_expense(&mut self, id: &str) -> Result<(), LedgerError> {
        self.conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Insert everything in one transaction; nothing is kept if any row fails
    fn import(&mut self, dataset: &Dataset) -> Result<(), LedgerError> {
        let tx = self.conn.transaction()?;
        for school in &dataset.schools {
            insert_school_row(&tx, school)?;
        }
        for student in &dataset.students {
            upsert_student_row(&tx, student)?;
        }
        for payment in dataset.payments.sorted_records() {
            insert_payment_row(&tx, payment)?;
        }
        // loaded newest first, so insert oldest first
        for expense in dataset.expenses.iter().rev() {
            insert_expense_row(&tx, expense)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn backend(&self) -> BackendType {
        BackendType::Sqlite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn populated() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_school(&School {
                id: "sc".to_string(),
                name: "Fatih Koleji".to_string(),
                location: Some("Kadıköy".to_string()),
            })
            .unwrap();
        store
            .upsert_student(&Student {
                id: "st".to_string(),
                school_id: "sc".to_string(),
                name: "Ece".to_string(),
                parent_name: "Murat".to_string(),
                phone: "0532".to_string(),
                monthly_fee: Decimal::new(185050, 2),
            })
            .unwrap();
        store
            .insert_payment(&PaymentRecord::paid("st", "2024-01", Decimal::new(185050, 2)))
            .unwrap();
        store
            .insert_expense(&Expense {
                id: "ex".to_string(),
                category: ExpenseCategory::MotorVehicleTax,
                description: "MTV 1. taksit".to_string(),
                amount: Decimal::new(4300, 0),
                date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            })
            .unwrap();
        store
    }

    #[test]
    fn test_round_trip_all_entities() {
        let dataset = populated().load().unwrap();

        assert_eq!(dataset.schools[0].location.as_deref(), Some("Kadıköy"));
        assert_eq!(dataset.students[0].monthly_fee, Decimal::new(185050, 2));
        let payment = dataset.payments.get("st", "2024-01").unwrap();
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.paid_amount, Decimal::new(185050, 2));
        assert_eq!(dataset.expenses[0].category, ExpenseCategory::MotorVehicleTax);
        assert_eq!(
            dataset.expenses[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_upsert_student_updates_in_place() {
        let mut store = populated();
        let mut student = store.load().unwrap().students[0].clone();
        student.phone = "0533".to_string();

        store.upsert_student(&student).unwrap();

        let students = store.load().unwrap().students;
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].phone, "0533");
    }

    #[test]
    fn test_deletes() {
        let mut store = populated();

        store.delete_payment("st", "2024-01").unwrap();
        store.delete_student("st").unwrap();
        store.delete_school("sc").unwrap();
        store.delete_expense("ex").unwrap();
        // deleting again is not an error
        store.delete_school("sc").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_school_id_rejected() {
        let mut store = populated();
        let result = store.insert_school(&School {
            id: "sc".to_string(),
            name: "Başka".to_string(),
            location: None,
        });
        assert!(matches!(result, Err(LedgerError::DatabaseError { .. })));
    }

    #[test]
    fn test_import_rolls_back_on_failure() {
        let mut source = populated().load().unwrap();
        let duplicate = source.schools[0].clone();
        source.schools.push(duplicate);

        let mut store = SqliteStore::open_in_memory().unwrap();
        let result = store.import(&source);

        assert!(matches!(result, Err(LedgerError::DatabaseError { .. })));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_import_keeps_expense_order() {
        let mut source = populated().load().unwrap();
        let mut older = source.expenses[0].clone();
        older.id = "older".to_string();
        source.expenses.push(older);

        let mut store = SqliteStore::open_in_memory().unwrap();
        store.import(&source).unwrap();

        assert_eq!(store.load().unwrap(), source);
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store
                .insert_payment(&PaymentRecord::paid("a", "2023-11", Decimal::new(900, 0)))
                .unwrap();
        }

        let dataset = SqliteStore::open(&path).unwrap().load().unwrap();
        assert!(dataset.payments.is_paid("a", "2023-11"));
    }
}
