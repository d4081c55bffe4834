//! Statistics aggregator.
//!
//! Pure functions over a registry copy and the ledger. The two empty-registry
//! base cases differ on purpose: coherence defaults to `0.0`, efficiency to
//! `1.0`.

use ananta_field::{Field, StatisticsSnapshot};

use crate::ledger::InterferenceLedger;
use crate::registry::FieldRegistry;

/// Share of fields in a coherent state, `0.0` for no fields.
#[must_use]
pub fn coherence_ratio(fields: &[Field]) -> f64 {
    if fields.is_empty() {
        return 0.0;
    }
    let coherent = fields.iter().filter(|f| f.state.is_coherent()).count();
    coherent as f64 / fields.len() as f64
}

/// Mean amplitude magnitude, `1.0` for no fields.
#[must_use]
pub fn energy_efficiency(fields: &[Field]) -> f64 {
    if fields.is_empty() {
        return 1.0;
    }
    let total: f64 = fields.iter().map(|f| f.amplitude.magnitude()).sum();
    total / fields.len() as f64
}

/// Number of fields in a device-driving state.
#[must_use]
pub fn active_device_count(fields: &[Field]) -> usize {
    fields.iter().filter(|f| f.state.drives_device()).count()
}

/// Build a snapshot from an already-copied field list.
///
/// `active_fields` is the length of `fields`, so the snapshot is internally
/// consistent even while writers keep changing the registry.
#[must_use]
pub fn aggregate(fields: &[Field], ledger: &InterferenceLedger) -> StatisticsSnapshot {
    StatisticsSnapshot {
        active_fields: fields.len(),
        entangled_pair_count: ledger.entangled_pair_count(),
        coherence_ratio: coherence_ratio(fields),
        energy_efficiency: energy_efficiency(fields),
        linked: !fields.is_empty() && !ledger.is_empty(),
        active_device_count: active_device_count(fields),
    }
}

/// Copy the registry and aggregate it.
#[must_use]
pub fn compute(registry: &FieldRegistry, ledger: &InterferenceLedger) -> StatisticsSnapshot {
    aggregate(&registry.snapshot_all(), ledger)
}
