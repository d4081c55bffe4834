//! Interference field records kept in the engine's ledger.

use std::collections::BTreeMap;

use ananta_math::SphericalCoord;
use serde::{Deserialize, Serialize};

use crate::field::Field;

/// One declared entanglement between fields, as an open map of labels to
/// field indices (e.g. `{"first": 0, "second": 1}`).
pub type EntangledPair = BTreeMap<String, i32>;

/// A derived record grouping several fields and the entangled pairs among
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterferenceField {
    /// Interference pattern kind, opaque to the engine.
    #[serde(rename = "type")]
    pub kind: i32,
    /// Centre of the interference region.
    pub center: SphericalCoord,
    /// Radius of the interference region.
    #[serde(rename = "fieldRadius")]
    pub radius: f64,
    /// The fields taking part.
    pub source_fields: Vec<Field>,
    /// Entangled pairs declared among `source_fields`.
    pub entangled_pairs: Vec<EntangledPair>,
}

impl InterferenceField {
    /// Number of entangled pairs declared by this record.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.entangled_pairs.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::state::QuantumState;

    use super::*;

    #[test]
    fn test_decode_host_payload() {
        let payload = serde_json::json!({
            "type": 2,
            "center": { "r": 0.0, "theta": 0.0, "phi": 0.0, "height": 2.5 },
            "fieldRadius": 3.0,
            "sourceFields": [{
                "frequency": 432.0,
                "position": { "r": 1.0, "theta": 0.0, "phi": 0.0, "height": 0.0 },
                "quantumState": 4,
                "amplitude": { "real": 1.0, "imaginary": 0.0 },
                "phase": 0.0,
                "timestamp": 0,
            }],
            "entangledPairs": [{ "first": 0, "second": 1 }, { "first": 1, "second": 2 }],
        });
        let field: InterferenceField = serde_json::from_value(payload).unwrap();
        assert_eq!(field.kind, 2);
        assert_eq!(field.radius, 3.0);
        assert_eq!(field.source_fields[0].state, QuantumState::Entangled);
        assert_eq!(field.pair_count(), 2);
        assert_eq!(field.entangled_pairs[1]["second"], 2);
    }

    #[test]
    fn test_pair_values_must_be_integers() {
        let payload = serde_json::json!({
            "type": 0,
            "center": { "r": 0.0, "theta": 0.0, "phi": 0.0, "height": 0.0 },
            "fieldRadius": 1.0,
            "sourceFields": [],
            "entangledPairs": [{ "first": "zero" }],
        });
        assert!(serde_json::from_value::<InterferenceField>(payload).is_err());
    }
}
