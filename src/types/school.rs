//! School and student types
//!
//! Schools group students; a student owes a fixed fee for every academic month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// School identifier
pub type SchoolId = String;

/// Student identifier
pub type StudentId = String;

/// A school served by the shuttle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl School {
    /// Create a school with a freshly generated identifier
    pub fn new(name: impl Into<String>, location: Option<String>) -> Self {
        School {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            location: location.filter(|l| !l.trim().is_empty()),
        }
    }
}

/// An enrolled student
///
/// Field names serialize in camelCase so documents written by the browser
/// dashboard load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,

    /// Owning school
    pub school_id: SchoolId,

    pub name: String,

    /// Guardian to contact about payments
    pub parent_name: String,

    pub phone: String,

    /// Amount owed for every billing month
    ///
    /// Fee changes are not tracked historically: debt is always computed
    /// with the current fee.
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_fee: Decimal,
}

/// Student fields supplied by the user, before an identifier is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub school_id: SchoolId,
    pub name: String,
    pub parent_name: String,
    pub phone: String,
    pub monthly_fee: Decimal,
}

impl NewStudent {
    /// Assign a fresh identifier
    pub fn into_student(self) -> Student {
        Student {
            id: uuid::Uuid::new_v4().to_string(),
            school_id: self.school_id,
            name: self.name,
            parent_name: self.parent_name,
            phone: self.phone,
            monthly_fee: self.monthly_fee,
        }
    }
}

/// Partial update of a student; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentUpdate {
    pub school_id: Option<SchoolId>,
    pub name: Option<String>,
    pub parent_name: Option<String>,
    pub phone: Option<String>,
    pub monthly_fee: Option<Decimal>,
}

impl StudentUpdate {
    /// Produce the updated copy of `student`
    pub fn apply(&self, student: &Student) -> Student {
        let mut updated = student.clone();
        if let Some(school_id) = &self.school_id {
            updated.school_id = school_id.clone();
        }
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(parent_name) = &self.parent_name {
            updated.parent_name = parent_name.clone();
        }
        if let Some(phone) = &self.phone {
            updated.phone = phone.clone();
        }
        if let Some(fee) = self.monthly_fee {
            updated.monthly_fee = fee;
        }
        updated
    }
}
