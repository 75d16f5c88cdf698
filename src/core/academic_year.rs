//! Academic-year resolution
//!
//! School billing runs from September through June, crossing a calendar-year
//! boundary. July and August are not billed and have no academic month.
//!
//! Given today's date, every academic month maps to exactly one calendar
//! month of the *current* academic year:
//!
//! - Jan-Jun today, Sep-Dec month: previous calendar year
//! - Sep-Dec today, Jan-Jun month: next calendar year
//! - anything else: this calendar year
//!
//! July and August fall under the last rule for both arguments, so during the
//! summer break Sep-Dec resolve to the upcoming autumn and Jan-Jun to the
//! spring just finished.

use crate::types::MonthToken;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// One of the ten billed months, in academic order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcademicMonth {
    September,
    October,
    November,
    December,
    January,
    February,
    March,
    April,
    May,
    June,
}

impl AcademicMonth {
    /// All academic months, September first
    pub const ALL: [AcademicMonth; 10] = [
        AcademicMonth::September,
        AcademicMonth::October,
        AcademicMonth::November,
        AcademicMonth::December,
        AcademicMonth::January,
        AcademicMonth::February,
        AcademicMonth::March,
        AcademicMonth::April,
        AcademicMonth::May,
        AcademicMonth::June,
    ];

    /// Calendar month number (1-12)
    pub fn number(&self) -> u32 {
        match self {
            AcademicMonth::September => 9,
            AcademicMonth::October => 10,
            AcademicMonth::November => 11,
            AcademicMonth::December => 12,
            AcademicMonth::January => 1,
            AcademicMonth::February => 2,
            AcademicMonth::March => 3,
            AcademicMonth::April => 4,
            AcademicMonth::May => 5,
            AcademicMonth::June => 6,
        }
    }

    /// Two-digit month id, e.g. `"09"`
    pub fn id(&self) -> String {
        format!("{:02}", self.number())
    }

    /// Display name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            AcademicMonth::September => "Eylül",
            AcademicMonth::October => "Ekim",
            AcademicMonth::November => "Kasım",
            AcademicMonth::December => "Aralık",
            AcademicMonth::January => "Ocak",
            AcademicMonth::February => "Şubat",
            AcademicMonth::March => "Mart",
            AcademicMonth::April => "Nisan",
            AcademicMonth::May => "Mayıs",
            AcademicMonth::June => "Haziran",
        }
    }

    /// Academic month for a calendar month number
    ///
    /// July, August and out-of-range numbers are not applicable.
    pub fn from_number(number: u32) -> Option<Self> {
        AcademicMonth::ALL.into_iter().find(|m| m.number() == number)
    }

    /// Parse a one- or two-digit month id such as `"9"` or `"09"`
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() || id.len() > 2 || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        id.parse().ok().and_then(AcademicMonth::from_number)
    }

    /// Calendar year this month belongs to within the academic year of `today`
    pub fn resolve_year(&self, today: NaiveDate) -> i32 {
        let current_year = today.year();
        let current_month = today.month();
        let month = self.number();

        if current_month < 7 && month >= 9 {
            current_year - 1
        } else if current_month >= 9 && month < 7 {
            current_year + 1
        } else {
            current_year
        }
    }

    /// Payment token of this month within the academic year of `today`
    ///
    /// Tokens are limited to years 0000-9999; a resolved year outside that
    /// range saturates to the nearest bound, keeping this month.
    pub fn token(&self, today: NaiveDate) -> MonthToken {
        MonthToken::saturating(self.resolve_year(today), self.number())
    }
}

impl fmt::Display for AcademicMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a calendar month number to its token in the current academic year
///
/// Returns `None` for July, August and numbers outside 1-12.
pub fn resolve_month(number: u32, today: NaiveDate) -> Option<MonthToken> {
    AcademicMonth::from_number(number).map(|m| m.token(today))
}

/// The academic months in fixed order paired with their tokens for `today`
pub fn academic_calendar(today: NaiveDate) -> Vec<(AcademicMonth, MonthToken)> {
    AcademicMonth::ALL
        .into_iter()
        .map(|m| (m, m.token(today)))
        .collect()
}
