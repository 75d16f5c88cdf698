//! One-time migration between stores
//!
//! Copies every entity from a source store (normally the local JSON document)
//! into a target store (normally the SQLite database). The target must be
//! empty so a migration cannot run twice into the same database.

use crate::storage::Store;
use crate::types::LedgerError;

/// Number of entities copied per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    pub schools: usize,
    pub students: usize,
    pub payments: usize,
    pub expenses: usize,
}

/// Copy everything in `source` into `target`
///
/// The copy goes through [`Store::import`], so a failure leaves the target
/// as empty as it was and the migration can be run again.
///
/// # Errors
///
/// Returns `TargetNotEmpty` if the target already holds any entity, or the
/// storage error that aborted the import.
pub fn migrate(source: &dyn Store, target: &mut dyn Store) -> Result<MigrationSummary, LedgerError> {
    if !target.load()?.is_empty() {
        return Err(LedgerError::target_not_empty(&target.backend().to_string()));
    }

    let dataset = source.load()?;
    let summary = MigrationSummary {
        schools: dataset.schools.len(),
        students: dataset.students.len(),
        payments: dataset.payments.len(),
        expenses: dataset.expenses.len(),
    };

    if let Err(e) = target.import(&dataset) {
        tracing::error!(to = %target.backend(), error = %e, "migration rolled back");
        return Err(e);
    }

    tracing::info!(
        from = %source.backend(),
        to = %target.backend(),
        schools = summary.schools,
        students = summary.students,
        payments = summary.payments,
        expenses = summary.expenses,
        "migration complete"
    );

    Ok(summary)
}
