//! Payment-related types
//!
//! A payment record marks one student as paid for one billing month. Records
//! are keyed by `(student_id, month)` where `month` is a `YYYY-MM` token kept
//! verbatim as text, so a malformed token loaded from storage is carried
//! along and simply never matched.

use super::school::StudentId;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment state of a record
///
/// Only `Paid` is ever written; existence of a record already means paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }
}

/// One student's payment for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub student_id: StudentId,

    /// Billing month token (`YYYY-MM`)
    pub month: String,

    pub status: PaymentStatus,

    /// Amount actually collected, equal to the student's fee at toggle time
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
}

impl PaymentRecord {
    /// Create a paid record
    pub fn paid(student_id: impl Into<StudentId>, month: impl Into<String>, amount: Decimal) -> Self {
        PaymentRecord {
            student_id: student_id.into(),
            month: month.into(),
            status: PaymentStatus::Paid,
            paid_amount: amount,
        }
    }
}

/// A calendar month, rendered as the `YYYY-MM` join key of payment records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthToken {
    year: i32,
    month: u32,
}

impl MonthToken {
    pub const MIN_YEAR: i32 = 0;
    pub const MAX_YEAR: i32 = 9999;

    /// Build a token; `None` unless `month` is 1-12 and `year` has four digits
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            Some(MonthToken { year, month })
        } else {
            None
        }
    }

    /// Build a token, clamping `year` to 0000-9999 and `month` to 1-12
    pub fn saturating(year: i32, month: u32) -> Self {
        MonthToken {
            year: year.clamp(Self::MIN_YEAR, Self::MAX_YEAR),
            month: month.clamp(1, 12),
        }
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        MonthToken {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Strictly parse `YYYY-MM`
    pub fn parse(value: &str) -> Option<Self> {
        let bytes = value.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return None;
        }
        if !value[..4].bytes().all(|b| b.is_ascii_digit())
            || !value[5..].bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let year = value[..4].parse().ok()?;
        let month = value[5..].parse().ok()?;
        MonthToken::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the month
    pub fn first_day(&self) -> NaiveDate {
        // year and month are validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Whether `date` falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-03", Some((2024, 3)))]
    #[case("2023-12", Some((2023, 12)))]
    #[case("2024-3", None)]
    #[case("2024-13", None)]
    #[case("2024-00", None)]
    #[case("24-03-01", None)]
    #[case("abcd-ef", None)]
    #[case("2024/03", None)]
    #[case("", None)]
    fn test_parse(#[case] input: &str, #[case] expected: Option<(i32, u32)>) {
        let parsed = MonthToken::parse(input).map(|t| (t.year(), t.month()));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_display_zero_pads() {
        let token = MonthToken::new(2024, 1).unwrap();
        assert_eq!(token.to_string(), "2024-01");
        assert_eq!(MonthToken::parse(&token.to_string()), Some(token));
    }

    #[rstest]
    #[case::in_range(2024, 3, "2024-03")]
    #[case::past_max_year(10000, 1, "9999-01")]
    #[case::before_min_year(-1, 9, "0000-09")]
    #[case::month_out_of_range(2024, 13, "2024-12")]
    fn test_saturating(#[case] year: i32, #[case] month: u32, #[case] expected: &str) {
        assert_eq!(MonthToken::saturating(year, month).to_string(), expected);
    }

    #[test]
    fn test_contains_and_first_day() {
        let token = MonthToken::new(2024, 2).unwrap();
        assert!(token.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!token.contains(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()));
        assert_eq!(token.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_paid_record_status() {
        let record = PaymentRecord::paid("s1", "2024-03", Decimal::new(1500, 0));
        assert_eq!(record.status, PaymentStatus::Paid);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "paid");
        assert_eq!(json["studentId"], "s1");
        assert_eq!(json["paidAmount"].as_f64(), Some(1500.0));
    }

    #[test]
    fn test_paid_amount_accepts_legacy_string() {
        let json = r#"{"studentId":"s1","month":"2024-03","status":"paid","paidAmount":"1500.50"}"#;
        let record: PaymentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.paid_amount, Decimal::new(150050, 2));
    }
}
