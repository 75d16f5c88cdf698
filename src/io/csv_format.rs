//! CSV output for listings and reports
//!
//! Every command that prints data writes CSV to the supplied writer, one
//! header row followed by data rows. Money is printed with two decimals.
//!
//! All functions are pure apart from writing to `output`.

use crate::core::reports::{
    DashboardSummary, MonthDetail, MonthlyRow, OverdueReport, PaymentGrid, SchoolIncomeRow,
};
use crate::core::AcademicMonth;
use crate::types::{Expense, LedgerError, School, Student};
use csv::Writer;
use rust_decimal::Decimal;
use std::io::Write;

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn finish(mut writer: Writer<&mut dyn Write>) -> Result<(), LedgerError> {
    writer.flush()?;
    Ok(())
}

/// Schools with their student counts
pub fn write_schools_csv(summary: &DashboardSummary, schools: &[&School], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["id", "name", "location", "students"])?;

    for school in schools {
        let students = summary
            .schools
            .iter()
            .find(|h| h.school_id == school.id)
            .map(|h| h.students)
            .unwrap_or(0);
        writer.write_record([
            school.id.as_str(),
            school.name.as_str(),
            school.location.as_deref().unwrap_or(""),
            &students.to_string(),
        ])?;
    }

    finish(writer)
}

pub fn write_students_csv(students: &[&Student], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["id", "school_id", "name", "parent_name", "phone", "monthly_fee"])?;

    for student in students {
        writer.write_record([
            student.id.as_str(),
            student.school_id.as_str(),
            student.name.as_str(),
            student.parent_name.as_str(),
            student.phone.as_str(),
            &money(student.monthly_fee),
        ])?;
    }

    finish(writer)
}

pub fn write_expenses_csv(expenses: &[&Expense], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["id", "date", "category", "description", "amount"])?;

    for expense in expenses {
        writer.write_record([
            expense.id.as_str(),
            &expense.date.format("%Y-%m-%d").to_string(),
            expense.category.label(),
            expense.description.as_str(),
            &money(expense.amount),
        ])?;
    }

    finish(writer)
}

/// Dashboard figures as `metric,value` pairs
pub fn write_dashboard_csv(summary: &DashboardSummary, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["metric", "value"])?;

    let rows = [
        ("total_students", summary.total_students.to_string()),
        ("schools", summary.school_count.to_string()),
        ("total_revenue", money(summary.total_revenue)),
        ("total_expenses", money(summary.total_expenses)),
        ("net_balance", money(summary.net_balance)),
        ("pending_this_month", summary.pending_this_month.to_string()),
    ];
    for (metric, value) in rows {
        writer.write_record([metric, value.as_str()])?;
    }

    finish(writer)
}

pub fn write_monthly_csv(rows: &[MonthlyRow], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["month", "token", "income", "expense", "net"])?;

    for row in rows {
        writer.write_record([
            row.month.name(),
            &row.token.to_string(),
            &money(row.income),
            &money(row.expense),
            &money(row.net),
        ])?;
    }

    finish(writer)
}

/// Per-school income, one column per academic month
pub fn write_school_report_csv(rows: &[SchoolIncomeRow], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    let mut header = vec!["school"];
    header.extend(AcademicMonth::ALL.iter().map(|m| m.name()));
    header.push("total");
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.name.clone()];
        record.extend(row.monthly.iter().map(|amount| money(*amount)));
        record.push(money(row.total));
        writer.write_record(&record)?;
    }

    finish(writer)
}

/// Students with overdue months, followed by a `TOTAL` row
pub fn write_overdue_csv(report: &OverdueReport, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record([
        "student_id",
        "student",
        "parent",
        "phone",
        "school",
        "overdue_months",
        "count",
        "debt",
    ])?;

    for row in &report.rows {
        let months: Vec<&str> = row.months.iter().map(|m| m.name()).collect();
        writer.write_record([
            row.student_id.as_str(),
            row.student_name.as_str(),
            row.parent_name.as_str(),
            row.phone.as_str(),
            row.school_name.as_str(),
            &months.join(" "),
            &row.months.len().to_string(),
            &money(row.debt),
        ])?;
    }
    writer.write_record(["", "TOTAL", "", "", "", "", "", &money(report.total_debt)])?;

    finish(writer)
}

/// Payments and expenses of one month, followed by a `net` row
pub fn write_month_detail_csv(detail: &MonthDetail, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["kind", "date", "name", "category", "amount"])?;

    let month = detail.token.to_string();
    for payment in &detail.payments {
        writer.write_record([
            "income",
            month.as_str(),
            payment.student_name.as_str(),
            payment.school_name.as_str(),
            &money(payment.amount),
        ])?;
    }
    for expense in &detail.expenses {
        writer.write_record([
            "expense",
            &expense.date.format("%Y-%m-%d").to_string(),
            expense.description.as_str(),
            expense.category.label(),
            &money(expense.amount),
        ])?;
    }
    writer.write_record(["net", month.as_str(), "", "", &money(detail.net)])?;

    finish(writer)
}

/// Paid/unpaid matrix of one school, one column per month token
pub fn write_grid_csv(grid: &PaymentGrid, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    let mut header = vec!["student_id".to_string(), "student".to_string(), "monthly_fee".to_string()];
    header.extend(grid.columns.iter().map(|(_, token)| token.to_string()));
    writer.write_record(&header)?;

    for row in &grid.rows {
        let mut record = vec![row.student_id.clone(), row.student_name.clone(), money(row.monthly_fee)];
        record.extend(
            row.paid
                .iter()
                .map(|paid| if *paid { "paid" } else { "unpaid" }.to_string()),
        );
        writer.write_record(&record)?;
    }

    finish(writer)
}
