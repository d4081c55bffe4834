//! Field registry — concurrent storage of field records.
//!
//! The registry maps a [`FieldKey`] to the latest [`Field`] stored at that
//! position. Writers are host callers (`process_field`) and the background
//! decoherence pass; readers are statistics and the broadcaster. Every read
//! hands out copies, so no caller ever iterates the live map.

use ananta_field::{Field, FieldKey, QuantumState};
use dashmap::DashMap;
use rand::Rng;

/// Concurrent map of field records keyed by position.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: DashMap<FieldKey, Field>,
}

impl FieldRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: DashMap::new(),
        }
    }

    /// Insert a field, replacing any field already stored under the same key.
    ///
    /// Returns the replaced field, if any.
    pub fn upsert(&self, field: Field) -> Option<Field> {
        self.fields.insert(field.key(), field)
    }

    /// Returns a copy of the field stored under `key`.
    #[must_use]
    pub fn get(&self, key: &FieldKey) -> Option<Field> {
        self.fields.get(key).map(|entry| *entry.value())
    }

    /// Copy every stored field out of the registry.
    ///
    /// The order is unspecified. Concurrent writers may land before or after
    /// the copy of their shard but never mid-field.
    #[must_use]
    pub fn snapshot_all(&self) -> Vec<Field> {
        self.fields.iter().map(|entry| *entry.value()).collect()
    }

    /// Keys of every field currently in `state`.
    #[must_use]
    pub fn keys_in_state(&self, state: QuantumState) -> Vec<FieldKey> {
        self.fields
            .iter()
            .filter(|entry| entry.value().state == state)
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Move the field under `key` from `from` to `to`.
    ///
    /// Returns `false` without touching the registry if the key is gone or
    /// the stored field is no longer in `from`.
    pub fn transition(&self, key: &FieldKey, from: QuantumState, to: QuantumState) -> bool {
        match self.fields.get_mut(key) {
            Some(mut entry) if entry.state == from => {
                entry.state = to;
                true
            }
            _ => false,
        }
    }

    /// Returns the number of stored fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Remove every field.
    pub fn clear(&self) {
        self.fields.clear();
    }
}

/// Perturb a field's amplitude by the given uncertainty.
///
/// A single draw `noise = (U(0,1) - 0.5) * uncertainty` is added to both the
/// real and the imaginary part. With `uncertainty <= 0` the field is returned
/// unchanged and no random number is consumed.
#[must_use]
pub fn apply_noise<R: Rng + ?Sized>(field: Field, uncertainty: f64, rng: &mut R) -> Field {
    if uncertainty <= 0.0 {
        return field;
    }
    let noise = (rng.random::<f64>() - 0.5) * uncertainty;
    field.with_amplitude(field.amplitude.shifted(noise))
}
