//! Summary and report views
//!
//! Every report is a pure function of a dataset snapshot and today's date.
//! Monthly figures always use the academic-year tokens resolved for `as_of`,
//! so all views agree on which calendar year a month belongs to.
//!
//! Payments whose student no longer exists still count as income. The
//! per-school report leaves them out; the month detail lists them under
//! [`UNKNOWN_STUDENT`].

use crate::core::academic_year::{academic_calendar, AcademicMonth};
use crate::core::dataset::Dataset;
use crate::types::{Expense, MonthToken, SchoolId, StudentId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Name shown for a payment whose student was deleted
pub const UNKNOWN_STUDENT: &str = "Bilinmeyen Öğrenci";

/// Student count of one school
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolHeadcount {
    pub school_id: SchoolId,
    pub name: String,
    pub students: usize,
}

/// Top-level dashboard figures
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_students: usize,
    pub school_count: usize,
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    /// Revenue minus expenses
    pub net_balance: Decimal,
    /// Students minus records for the current calendar month, floored at zero
    pub pending_this_month: usize,
    pub schools: Vec<SchoolHeadcount>,
}

/// Income and expense of one academic month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRow {
    pub month: AcademicMonth,
    pub token: MonthToken,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Per-month income of one school
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolIncomeRow {
    pub school_id: SchoolId,
    pub name: String,
    /// One entry per academic month, September first
    pub monthly: Vec<Decimal>,
    pub total: Decimal,
}

/// A student with at least one overdue month
#[derive(Debug, Clone, PartialEq)]
pub struct OverdueRow {
    pub student_id: StudentId,
    pub student_name: String,
    pub parent_name: String,
    pub phone: String,
    /// Name of the owning school, empty if the school is gone
    pub school_name: String,
    pub months: Vec<AcademicMonth>,
    pub debt: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverdueReport {
    pub rows: Vec<OverdueRow>,
    /// Outstanding debt summed over every student
    pub total_debt: Decimal,
}

/// A payment joined with its student
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLine {
    pub student_id: StudentId,
    pub student_name: String,
    pub school_name: String,
    pub amount: Decimal,
}

/// Everything collected and spent in one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthDetail {
    pub token: MonthToken,
    pub payments: Vec<PaymentLine>,
    pub expenses: Vec<Expense>,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Paid flags of one student across the academic year
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub student_id: StudentId,
    pub student_name: String,
    pub monthly_fee: Decimal,
    pub paid: Vec<bool>,
}

/// Payment grid of a school
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentGrid {
    pub school_name: String,
    pub columns: Vec<(AcademicMonth, MonthToken)>,
    pub rows: Vec<GridRow>,
}

pub fn dashboard_summary(dataset: &Dataset, as_of: NaiveDate) -> DashboardSummary {
    let total_revenue = dataset.payments.total_paid();
    let total_expenses: Decimal = dataset.expenses.iter().map(|e| e.amount).sum();
    let current = MonthToken::of(as_of).to_string();
    let paid_this_month = dataset.payments.records_for_month(&current).len();

    let schools = dataset
        .schools_by_name()
        .into_iter()
        .map(|school| SchoolHeadcount {
            school_id: school.id.clone(),
            name: school.name.clone(),
            students: dataset.students_of(&school.id).count(),
        })
        .collect();

    DashboardSummary {
        total_students: dataset.students.len(),
        school_count: dataset.schools.len(),
        total_revenue,
        total_expenses,
        net_balance: total_revenue - total_expenses,
        pending_this_month: dataset.students.len().saturating_sub(paid_this_month),
        schools,
    }
}

fn expenses_in(expenses: &[Expense], token: MonthToken) -> Decimal {
    expenses
        .iter()
        .filter(|e| token.contains(e.date))
        .map(|e| e.amount)
        .sum()
}

pub fn monthly_report(dataset: &Dataset, as_of: NaiveDate) -> Vec<MonthlyRow> {
    academic_calendar(as_of)
        .into_iter()
        .map(|(month, token)| {
            let key = token.to_string();
            let income: Decimal = dataset
                .payments
                .records_for_month(&key)
                .iter()
                .map(|r| r.paid_amount)
                .sum();
            let expense = expenses_in(&dataset.expenses, token);
            MonthlyRow {
                month,
                token,
                income,
                expense,
                net: income - expense,
            }
        })
        .collect()
}

pub fn school_report(dataset: &Dataset, as_of: NaiveDate) -> Vec<SchoolIncomeRow> {
    let calendar = academic_calendar(as_of);

    dataset
        .schools_by_name()
        .into_iter()
        .map(|school| {
            let monthly: Vec<Decimal> = calendar
                .iter()
                .map(|(_, token)| {
                    dataset
                        .payments
                        .records_for_month(&token.to_string())
                        .iter()
                        .filter(|r| {
                            dataset
                                .student(&r.student_id)
                                .is_some_and(|s| s.school_id == school.id)
                        })
                        .map(|r| r.paid_amount)
                        .sum::<Decimal>()
                })
                .collect();
            SchoolIncomeRow {
                school_id: school.id.clone(),
                name: school.name.clone(),
                total: monthly.iter().copied().sum(),
                monthly,
            }
        })
        .collect()
}

pub fn overdue_report(dataset: &Dataset, as_of: NaiveDate) -> OverdueReport {
    let mut rows = Vec::new();
    let mut total_debt = Decimal::ZERO;

    for student in &dataset.students {
        let months = dataset.payments.overdue_months(&student.id, as_of);
        if months.is_empty() {
            continue;
        }
        let debt = Decimal::from(months.len()) * student.monthly_fee;
        total_debt += debt;
        rows.push(OverdueRow {
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            parent_name: student.parent_name.clone(),
            phone: student.phone.clone(),
            school_name: dataset
                .school(&student.school_id)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            months,
            debt,
        });
    }

    OverdueReport { rows, total_debt }
}

pub fn month_detail(dataset: &Dataset, token: MonthToken) -> MonthDetail {
    let payments: Vec<PaymentLine> = dataset
        .payments
        .records_for_month(&token.to_string())
        .into_iter()
        .map(|record| match dataset.student(&record.student_id) {
            Some(student) => PaymentLine {
                student_id: student.id.clone(),
                student_name: student.name.clone(),
                school_name: dataset
                    .school(&student.school_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                amount: record.paid_amount,
            },
            None => PaymentLine {
                student_id: record.student_id.clone(),
                student_name: UNKNOWN_STUDENT.to_string(),
                school_name: String::new(),
                amount: record.paid_amount,
            },
        })
        .collect();

    let expenses: Vec<Expense> = dataset
        .expenses_by_date_desc()
        .into_iter()
        .filter(|e| token.contains(e.date))
        .cloned()
        .collect();

    let income: Decimal = payments.iter().map(|p| p.amount).sum();
    let expense: Decimal = expenses.iter().map(|e| e.amount).sum();

    MonthDetail {
        token,
        payments,
        expenses,
        income,
        expense,
        net: income - expense,
    }
}

/// Payment grid for a school, or `None` if the school does not exist
pub fn payment_grid(dataset: &Dataset, school_id: &str, as_of: NaiveDate) -> Option<PaymentGrid> {
    let school = dataset.school(school_id)?;
    let columns = academic_calendar(as_of);

    let rows = dataset
        .students_of(school_id)
        .map(|student| GridRow {
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            monthly_fee: student.monthly_fee,
            paid: columns
                .iter()
                .map(|(_, token)| dataset.payments.is_paid(&student.id, &token.to_string()))
                .collect(),
        })
        .collect();

    Some(PaymentGrid {
        school_name: school.name.clone(),
        columns,
        rows,
    })
}
