use crate::storage::StoreConfig;
use crate::types::{parse_date, ExpenseCategory, LedgerError};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// Track school shuttle payments and expenses
#[derive(Parser, Debug)]
#[command(name = "shuttle-ledger")]
#[command(about = "Track school shuttle payments and expenses", long_about = None)]
pub struct CliArgs {
    /// Local JSON store used when no database is configured
    #[arg(
        long = "data",
        value_name = "PATH",
        env = "LEDGER_DATA",
        default_value = "ledger.json",
        global = true
    )]
    pub data: PathBuf,

    /// SQLite database; when set it replaces the JSON store
    #[arg(long = "sqlite", value_name = "PATH", env = "LEDGER_SQLITE", global = true)]
    pub sqlite: Option<PathBuf>,

    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long = "today", value_name = "DATE", value_parser = parse_date_arg, global = true)]
    pub today: Option<NaiveDate>,

    /// Emit logs as JSON
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Register a school
    AddSchool {
        name: String,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a school and its students
    DeleteSchool { id: String },
    /// List schools with student counts
    Schools,
    /// Enroll a student
    AddStudent {
        #[arg(long)]
        school: String,
        #[arg(long)]
        name: String,
        #[arg(long = "parent")]
        parent_name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, value_parser = parse_amount_arg)]
        fee: Decimal,
    },
    /// Change a student's details
    UpdateStudent {
        id: String,
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "parent")]
        parent_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, value_parser = parse_amount_arg)]
        fee: Option<Decimal>,
    },
    /// Remove a student (payment history is kept)
    DeleteStudent { id: String },
    /// List students, optionally of one school
    Students {
        #[arg(long)]
        school: Option<String>,
    },
    /// Mark a month paid, or unpaid if it already was
    Toggle {
        student: String,
        /// Academic month number (09-12, 01-06) or a YYYY-MM token
        month: String,
    },
    /// Record an expense
    AddExpense {
        #[arg(long, value_parser = parse_category_arg)]
        category: ExpenseCategory,
        #[arg(long, value_parser = parse_amount_arg)]
        amount: Decimal,
        #[arg(long, default_value = "")]
        description: String,
        /// Defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Delete an expense
    DeleteExpense { id: String },
    /// List expenses, newest first
    Expenses,
    /// Headline figures
    Dashboard,
    /// Paid/unpaid grid of one school for the current academic year
    Grid { school: String },
    /// Income and expense per academic month
    Monthly,
    /// Income per school and academic month
    BySchool,
    /// Students with overdue months and total outstanding debt
    Overdue,
    /// Payments and expenses of one month
    MonthDetail {
        /// Academic month number or a YYYY-MM token
        month: String,
    },
    /// Copy the JSON store into the configured SQLite database (one time)
    Migrate,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

fn parse_amount_arg(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value.trim()).map_err(|_| LedgerError::invalid_amount(value).to_string())
}

fn parse_category_arg(value: &str) -> Result<ExpenseCategory, String> {
    ExpenseCategory::from_str(value).map_err(|e| e.to_string())
}

impl CliArgs {
    /// Storage configuration from the `--data` and `--sqlite` options
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            json_path: self.data.clone(),
            sqlite_path: self.sqlite.clone(),
        }
    }

    /// The `--today` override, or the local calendar date
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
