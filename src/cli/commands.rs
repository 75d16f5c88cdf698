//! Command execution
//!
//! Opens the configured store, runs one command against the application
//! context and writes its CSV output.

use crate::cli::args::{CliArgs, Command};
use crate::core::{reports, AcademicMonth, AppContext, PaymentState};
use crate::io::csv_format::{
    write_dashboard_csv, write_expenses_csv, write_grid_csv, write_month_detail_csv,
    write_monthly_csv, write_overdue_csv, write_school_report_csv, write_schools_csv,
    write_students_csv,
};
use crate::storage::{create_store, migrate, JsonStore, SqliteStore};
use crate::types::{LedgerError, MonthToken, NewExpense, NewStudent, StudentUpdate};
use chrono::NaiveDate;
use std::io::Write;

/// Turn a month argument into a payment token
///
/// Academic month numbers (`9`, `09`, ..., `06`) resolve within the academic
/// year of `today`; a full `YYYY-MM` token is taken as is. July, August and
/// anything else are rejected.
pub fn resolve_month_arg(value: &str, today: NaiveDate) -> Result<MonthToken, LedgerError> {
    if let Some(month) = AcademicMonth::from_id(value) {
        return Ok(month.token(today));
    }
    MonthToken::parse(value.trim()).ok_or_else(|| LedgerError::invalid_month(value))
}

/// Execute the parsed command, writing results to `output`
///
/// # Errors
///
/// Returns the first storage, lookup or validation error; nothing is written
/// to `output` for a failed mutation.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), LedgerError> {
    let today = args.today();

    if args.command == Command::Migrate {
        return run_migration(args, output);
    }

    let mut app = AppContext::open(create_store(&args.store_config())?)?;

    match &args.command {
        Command::AddSchool { name, location } => {
            let school = app.add_school(name, location.clone())?;
            writeln!(output, "{}", school.id)?;
        }
        Command::DeleteSchool { id } => {
            let removed = app.delete_school(id)?;
            writeln!(output, "deleted school {} and {} student(s)", id, removed)?;
        }
        Command::Schools => {
            let dataset = app.dataset();
            let summary = reports::dashboard_summary(dataset, today);
            write_schools_csv(&summary, &dataset.schools_by_name(), output)?;
        }
        Command::AddStudent {
            school,
            name,
            parent_name,
            phone,
            fee,
        } => {
            let student = app.add_student(NewStudent {
                school_id: school.clone(),
                name: name.clone(),
                parent_name: parent_name.clone(),
                phone: phone.clone(),
                monthly_fee: *fee,
            })?;
            writeln!(output, "{}", student.id)?;
        }
        Command::UpdateStudent {
            id,
            school,
            name,
            parent_name,
            phone,
            fee,
        } => {
            let update = StudentUpdate {
                school_id: school.clone(),
                name: name.clone(),
                parent_name: parent_name.clone(),
                phone: phone.clone(),
                monthly_fee: *fee,
            };
            let student = app.update_student(id, &update)?;
            write_students_csv(&[&student], output)?;
        }
        Command::DeleteStudent { id } => {
            app.delete_student(id)?;
            writeln!(output, "deleted student {}", id)?;
        }
        Command::Students { school } => {
            let dataset = app.dataset();
            let students: Vec<_> = match school {
                Some(school_id) => dataset.students_of(school_id).collect(),
                None => dataset.students.iter().collect(),
            };
            write_students_csv(&students, output)?;
        }
        Command::Toggle { student, month } => {
            let token = resolve_month_arg(month, today)?;
            let state = app.toggle_payment(student, &token.to_string())?;
            let label = match state {
                PaymentState::Paid => "paid",
                PaymentState::Unpaid => "unpaid",
            };
            writeln!(output, "{},{},{}", student, token, label)?;
        }
        Command::AddExpense {
            category,
            amount,
            description,
            date,
        } => {
            let expense = app.add_expense(NewExpense {
                category: *category,
                description: description.clone(),
                amount: *amount,
                date: date.unwrap_or(today),
            })?;
            writeln!(output, "{}", expense.id)?;
        }
        Command::DeleteExpense { id } => {
            app.delete_expense(id)?;
            writeln!(output, "deleted expense {}", id)?;
        }
        Command::Expenses => {
            write_expenses_csv(&app.dataset().expenses_by_date_desc(), output)?;
        }
        Command::Dashboard => {
            write_dashboard_csv(&reports::dashboard_summary(app.dataset(), today), output)?;
        }
        Command::Grid { school } => {
            let grid = reports::payment_grid(app.dataset(), school, today)
                .ok_or_else(|| LedgerError::school_not_found(school))?;
            write_grid_csv(&grid, output)?;
        }
        Command::Monthly => {
            write_monthly_csv(&reports::monthly_report(app.dataset(), today), output)?;
        }
        Command::BySchool => {
            write_school_report_csv(&reports::school_report(app.dataset(), today), output)?;
        }
        Command::Overdue => {
            write_overdue_csv(&reports::overdue_report(app.dataset(), today), output)?;
        }
        Command::MonthDetail { month } => {
            let token = resolve_month_arg(month, today)?;
            write_month_detail_csv(&reports::month_detail(app.dataset(), token), output)?;
        }
        Command::Migrate => unreachable!("handled above"),
    }

    Ok(())
}

fn run_migration(args: &CliArgs, output: &mut dyn Write) -> Result<(), LedgerError> {
    let sqlite_path = args
        .sqlite
        .as_ref()
        .ok_or(LedgerError::DatabaseNotConfigured)?;

    let source = JsonStore::open(&args.data)?;
    let mut target = SqliteStore::open(sqlite_path)?;
    let summary = migrate(&source, &mut target)?;

    writeln!(output, "entity,count")?;
    writeln!(output, "schools,{}", summary.schools)?;
    writeln!(output, "students,{}", summary.students)?;
    writeln!(output, "payments,{}", summary.payments)?;
    writeln!(output, "expenses,{}", summary.expenses)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::autumn_in_spring("10", date(2024, 3, 15), "2023-10")]
    #[case::spring_in_autumn("02", date(2024, 11, 1), "2025-02")]
    #[case::single_digit("9", date(2024, 9, 1), "2024-09")]
    #[case::full_token("2022-05", date(2024, 3, 15), "2022-05")]
    fn test_resolve_month_arg(#[case] input: &str, #[case] today: NaiveDate, #[case] expected: &str) {
        assert_eq!(resolve_month_arg(input, today).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case::july("07")]
    #[case::august("8")]
    #[case::words("Mart")]
    #[case::bad_token("2024-13")]
    fn test_resolve_month_arg_rejects(#[case] input: &str) {
        assert_eq!(
            resolve_month_arg(input, date(2024, 3, 15)),
            Err(LedgerError::invalid_month(input))
        );
    }
}
