//! Decoherence pass.
//!
//! Each superposed field gets one independent Bernoulli trial per pass: with
//! probability `p` it falls to [`QuantumState::Ground`]. The rule is tick
//! based and memoryless, so running passes twice as often doubles the
//! expected decoherence rate. No other state changes automatically.

use ananta_field::QuantumState;
use rand::Rng;
use tracing::debug;

use crate::registry::FieldRegistry;

/// Outcome of one decoherence pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoherenceReport {
    /// Superposed fields found at the start of the pass.
    pub examined: usize,
    /// Fields moved to ground.
    pub collapsed: usize,
    /// Fields whose trial succeeded but which were removed or rewritten
    /// before the transition could apply.
    pub skipped: usize,
}

/// Run one decoherence pass over `registry`.
///
/// Candidate keys are collected first, then each candidate is drawn and
/// transitioned individually. A field that vanished or changed state in the
/// meantime is skipped and the pass carries on.
pub fn decohere<R: Rng + ?Sized>(
    registry: &FieldRegistry,
    probability: f64,
    rng: &mut R,
) -> DecoherenceReport {
    let candidates = registry.keys_in_state(QuantumState::Superposition);
    let mut report = DecoherenceReport {
        examined: candidates.len(),
        ..DecoherenceReport::default()
    };

    for key in candidates {
        if rng.random::<f64>() >= probability {
            continue;
        }
        if registry.transition(&key, QuantumState::Superposition, QuantumState::Ground) {
            report.collapsed += 1;
        } else {
            debug!(key = %key, "field changed before decoherence applied, skipping");
            report.skipped += 1;
        }
    }

    report
}
