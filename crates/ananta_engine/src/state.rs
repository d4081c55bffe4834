//! Shared engine state.
//!
//! [`EngineState`] is the one piece of mutable state shared between host
//! callers and the background tick loop. Everything inside is safe for
//! concurrent use through `&self`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use ananta_field::{Field, InterferenceField, StatisticsSnapshot};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{DomeGeometry, EngineConfig, clamp_unit};
use crate::decoherence::{self, DecoherenceReport};
use crate::ledger::InterferenceLedger;
use crate::registry::{FieldRegistry, apply_noise};
use crate::statistics;

/// Registry, ledger, and engine-wide parameters.
#[derive(Debug)]
pub struct EngineState {
    registry: FieldRegistry,
    ledger: InterferenceLedger,
    /// `f64` bits of the current quantum uncertainty.
    uncertainty: AtomicU64,
    dome: RwLock<DomeGeometry>,
    rng: Mutex<StdRng>,
}

impl EngineState {
    /// Create empty state from a configuration.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            registry: FieldRegistry::new(),
            ledger: InterferenceLedger::new(),
            uncertainty: AtomicU64::new(clamp_unit(config.initial_uncertainty).to_bits()),
            dome: RwLock::new(config.dome),
            rng: Mutex::new(rng),
        }
    }

    /// The field registry.
    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// The interference ledger.
    #[must_use]
    pub fn ledger(&self) -> &InterferenceLedger {
        &self.ledger
    }

    /// Current quantum uncertainty, always in `[0, 1]`.
    #[must_use]
    pub fn uncertainty(&self) -> f64 {
        f64::from_bits(self.uncertainty.load(Ordering::Acquire))
    }

    /// Clamp and store a new quantum uncertainty. Returns the stored value.
    pub fn set_uncertainty(&self, value: f64) -> f64 {
        let clamped = clamp_unit(value);
        self.uncertainty.store(clamped.to_bits(), Ordering::Release);
        clamped
    }

    /// Current dome geometry.
    #[must_use]
    pub fn dome(&self) -> DomeGeometry {
        *self.dome.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the dome geometry.
    pub fn set_dome(&self, dome: DomeGeometry) {
        *self.dome.write().unwrap_or_else(PoisonError::into_inner) = dome;
    }

    /// Apply noise at the current uncertainty and store the result.
    ///
    /// Returns the field as stored.
    pub fn process(&self, field: Field) -> Field {
        let uncertainty = self.uncertainty();
        let noisy = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            apply_noise(field, uncertainty, &mut *rng)
        };
        self.registry.upsert(noisy);
        noisy
    }

    /// Append an interference record.
    pub fn add_interference(&self, field: InterferenceField) {
        self.ledger.add(field);
    }

    /// Run one decoherence pass with the engine's random source.
    pub fn decohere(&self, probability: f64) -> DecoherenceReport {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        decoherence::decohere(&self.registry, probability, &mut *rng)
    }

    /// Aggregate current statistics.
    #[must_use]
    pub fn statistics(&self) -> StatisticsSnapshot {
        statistics::compute(&self.registry, &self.ledger)
    }

    /// Clear the registry and the ledger. Parameters are kept.
    pub fn reset(&self) {
        self.registry.clear();
        self.ledger.clear();
    }
}

#[cfg(test)]
mod tests {
    use ananta_field::QuantumState;
    use ananta_math::{Complex, SphericalCoord};

    use super::*;

    fn seeded() -> EngineState {
        EngineState::new(&EngineConfig::default().with_seed(11))
    }

    #[test]
    fn test_uncertainty_is_clamped() {
        let state = seeded();
        assert_eq!(state.uncertainty(), 0.1);
        for (input, expected) in [(0.4, 0.4), (1.7, 1.0), (-3.0, 0.0), (1.0, 1.0), (0.0, 0.0)] {
            assert_eq!(state.set_uncertainty(input), expected);
            assert_eq!(state.uncertainty(), expected);
        }
    }

    #[test]
    fn test_process_without_uncertainty_stores_field_unchanged() {
        let state = seeded();
        state.set_uncertainty(0.0);
        let field = Field::new(440.0, SphericalCoord::new(1.0, 0.0, 0.0, 0.0), QuantumState::Ground);
        let stored = state.process(field);
        assert_eq!(stored, field);
        assert_eq!(state.registry().get(&field.key()), Some(field));
    }

    #[test]
    fn test_process_with_uncertainty_perturbs_amplitude() {
        let state = seeded();
        state.set_uncertainty(1.0);
        let field = Field::new(440.0, SphericalCoord::new(1.0, 0.0, 0.0, 0.0), QuantumState::Ground);
        let stored = state.process(field);
        assert_ne!(stored.amplitude, Complex::ONE);
        assert_eq!(state.registry().get(&field.key()), Some(stored));
    }

    #[test]
    fn test_reset_keeps_parameters() {
        let state = seeded();
        state.set_uncertainty(0.7);
        state.set_dome(DomeGeometry::new(20.0, 8.0));
        state.process(Field::new(1.0, SphericalCoord::ORIGIN, QuantumState::Ground));
        state.reset();
        assert!(state.registry().is_empty());
        assert!(state.ledger().is_empty());
        assert_eq!(state.uncertainty(), 0.7);
        assert_eq!(state.dome(), DomeGeometry::new(20.0, 8.0));
    }
}
