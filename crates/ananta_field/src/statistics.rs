//! System-wide statistics pushed to the host.

use serde::{Deserialize, Serialize};

/// Aggregates over the registry and ledger at one instant.
///
/// Snapshots are recomputed on demand and never stored by the engine. The
/// serialised key names are the ones the host UI already consumes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    /// Number of fields in the registry.
    pub active_fields: usize,
    /// Entangled pairs declared across the whole ledger.
    #[serde(rename = "entangledPairs")]
    pub entangled_pair_count: usize,
    /// Share of fields in a coherent state, in `[0, 1]`.
    pub coherence_ratio: f64,
    /// Mean amplitude magnitude.
    pub energy_efficiency: f64,
    /// Both the registry and the ledger hold records.
    #[serde(rename = "qrdConnected")]
    pub linked: bool,
    /// Fields in a device-driving state.
    #[serde(rename = "mechanicalDevicesActive")]
    pub active_device_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_keys() {
        let snapshot = StatisticsSnapshot {
            active_fields: 3,
            entangled_pair_count: 1,
            coherence_ratio: 0.5,
            energy_efficiency: 1.0,
            linked: true,
            active_device_count: 2,
        };
        let value = serde_json::to_value(snapshot).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "activeFields": 3,
                "entangledPairs": 1,
                "coherenceRatio": 0.5,
                "energyEfficiency": 1.0,
                "qrdConnected": true,
                "mechanicalDevicesActive": 2,
            })
        );
    }
}
