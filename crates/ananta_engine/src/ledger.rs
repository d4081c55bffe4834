//! Interference ledger — append-only list of interference records.

use std::sync::{PoisonError, RwLock};

use ananta_field::InterferenceField;

/// Append-only store of [`InterferenceField`] records.
///
/// Records are never edited once added; only an engine reset empties the
/// ledger.
#[derive(Debug, Default)]
pub struct InterferenceLedger {
    entries: RwLock<Vec<InterferenceField>>,
}

impl InterferenceLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append a record. No deduplication is performed.
    pub fn add(&self, field: InterferenceField) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(field);
    }

    /// Total entangled pairs declared across all records.
    #[must_use]
    pub fn entangled_pair_count(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(InterferenceField::pair_count)
            .sum()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if no record has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy every record out of the ledger, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<InterferenceField> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
