//! The [`Field`] record.

use std::time::{SystemTime, UNIX_EPOCH};

use ananta_math::{Complex, SphericalCoord};
use serde::{Deserialize, Serialize};

use crate::key::FieldKey;
use crate::state::QuantumState;

/// A simulated oscillator.
///
/// Fields are plain values. The engine stores copies in its registry and
/// only the decoherence pass rewrites a stored field's state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Oscillator frequency in hertz.
    pub frequency: f64,
    /// Source position under the dome.
    pub position: SphericalCoord,
    /// Current labelled state.
    #[serde(rename = "quantumState")]
    pub state: QuantumState,
    /// Complex amplitude.
    pub amplitude: Complex,
    /// Phase offset in radians.
    pub phase: f64,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Field {
    /// Create a fresh field with unit amplitude, zero phase, and the current
    /// wall-clock timestamp.
    #[must_use]
    pub fn new(frequency: f64, position: SphericalCoord, state: QuantumState) -> Self {
        Self {
            frequency,
            position,
            state,
            amplitude: Complex::ONE,
            phase: 0.0,
            timestamp: now_millis(),
        }
    }

    /// The registry key for this field.
    #[must_use]
    pub fn key(&self) -> FieldKey {
        FieldKey::from_position(&self.position)
    }

    /// Returns a copy in a different state.
    #[must_use]
    pub fn with_state(mut self, state: QuantumState) -> Self {
        self.state = state;
        self
    }

    /// Returns a copy with a different amplitude.
    #[must_use]
    pub fn with_amplitude(mut self, amplitude: Complex) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Returns `true` if every numeric member is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.frequency.is_finite()
            && self.position.is_finite()
            && self.amplitude.is_finite()
            && self.phase.is_finite()
    }
}

/// Milliseconds since the Unix epoch, saturating at zero for clocks set
/// before 1970.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Field {
        Field {
            frequency: 440.0,
            position: SphericalCoord::new(1.0, 0.0, 0.0, 0.0),
            state: QuantumState::Superposition,
            amplitude: Complex::new(0.75, -0.25),
            phase: 0.5,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_new_field_defaults() {
        let before = now_millis();
        let field = Field::new(220.0, SphericalCoord::ORIGIN, QuantumState::Excited);
        assert_eq!(field.amplitude, Complex::ONE);
        assert_eq!(field.phase, 0.0);
        assert_eq!(field.state, QuantumState::Excited);
        assert!(field.timestamp >= before);
    }

    #[test]
    fn test_wire_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "frequency": 440.0,
                "position": { "r": 1.0, "theta": 0.0, "phi": 0.0, "height": 0.0 },
                "quantumState": 3,
                "amplitude": { "real": 0.75, "imaginary": -0.25 },
                "phase": 0.5,
                "timestamp": 1_700_000_000_000_i64,
            })
        );
    }

    #[test]
    fn test_json_roundtrip_preserves_every_member() {
        let field = sample();
        let text = serde_json::to_string(&field).unwrap();
        let restored: Field = serde_json::from_str(&text).unwrap();
        assert_eq!(field, restored);
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let field = sample();
        let bytes = rmp_serde::to_vec_named(&field).unwrap();
        let restored: Field = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(field, restored);
    }

    #[test]
    fn test_missing_member_rejected() {
        let result: Result<Field, _> = serde_json::from_value(serde_json::json!({
            "frequency": 440.0,
            "quantumState": 0,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_with_state_keeps_key() {
        let field = sample();
        let ground = field.with_state(QuantumState::Ground);
        assert_eq!(ground.state, QuantumState::Ground);
        assert_eq!(ground.key(), field.key());
    }
}
