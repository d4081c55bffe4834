//! # ananta_field
//!
//! The data model of the acoustic field engine.
//!
//! This crate provides:
//!
//! - [`QuantumState`] — the closed, ordinal-stable state enumeration.
//! - [`Field`] — a simulated oscillator record.
//! - [`FieldKey`] — the registry key derived from a field's position.
//! - [`InterferenceField`] — a ledger record grouping fields and entangled pairs.
//! - [`StatisticsSnapshot`] — system-wide aggregates pushed to the host.
//!
//! All types serialise with the camelCase key names the host UI runtime
//! already speaks.

pub mod field;
pub mod interference;
pub mod key;
pub mod state;
pub mod statistics;

pub use field::{Field, now_millis};
pub use interference::{EntangledPair, InterferenceField};
pub use key::FieldKey;
pub use state::{QuantumState, UnknownStateError};
pub use statistics::StatisticsSnapshot;
