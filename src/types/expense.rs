//! Operating expense types

use super::error::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expense identifier
pub type ExpenseId = String;

/// Fixed set of expense categories
///
/// Persisted under the operator-facing labels so that existing documents
/// keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[serde(rename = "Yakıt")]
    Fuel,
    #[serde(rename = "Bakım-Onarım")]
    Maintenance,
    #[serde(rename = "Kasko")]
    ComprehensiveInsurance,
    #[serde(rename = "Sigorta")]
    Insurance,
    #[serde(rename = "Motorlu Taşıt Vergisi")]
    MotorVehicleTax,
    #[serde(rename = "Muayene")]
    Inspection,
    #[serde(rename = "Diğer")]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Fuel,
        ExpenseCategory::Maintenance,
        ExpenseCategory::ComprehensiveInsurance,
        ExpenseCategory::Insurance,
        ExpenseCategory::MotorVehicleTax,
        ExpenseCategory::Inspection,
        ExpenseCategory::Other,
    ];

    /// Label shown to the operator and stored on disk
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Fuel => "Yakıt",
            ExpenseCategory::Maintenance => "Bakım-Onarım",
            ExpenseCategory::ComprehensiveInsurance => "Kasko",
            ExpenseCategory::Insurance => "Sigorta",
            ExpenseCategory::MotorVehicleTax => "Motorlu Taşıt Vergisi",
            ExpenseCategory::Inspection => "Muayene",
            ExpenseCategory::Other => "Diğer",
        }
    }

    /// Kebab-case name accepted on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            ExpenseCategory::Fuel => "fuel",
            ExpenseCategory::Maintenance => "maintenance",
            ExpenseCategory::ComprehensiveInsurance => "comprehensive-insurance",
            ExpenseCategory::Insurance => "insurance",
            ExpenseCategory::MotorVehicleTax => "motor-vehicle-tax",
            ExpenseCategory::Inspection => "inspection",
            ExpenseCategory::Other => "other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenseCategory {
    type Err = LedgerError;

    /// Accepts either the stored label or the CLI slug (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.label() == needle || c.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| LedgerError::invalid_category(s))
    }
}

/// A single operating expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub category: ExpenseCategory,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

/// Expense fields supplied by the user
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl NewExpense {
    /// Validate the amount and assign a fresh identifier
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` unless the amount is strictly positive.
    pub fn into_expense(self) -> Result<Expense, LedgerError> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(&self.amount.to_string()));
        }
        Ok(Expense {
            id: uuid::Uuid::new_v4().to_string(),
            category: self.category,
            description: self.description,
            amount: self.amount,
            date: self.date,
        })
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| LedgerError::invalid_date(value))
}
