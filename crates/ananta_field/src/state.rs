//! Quantum state enumeration.
//!
//! States cross the host boundary as their ordinal, never by name, so the
//! discriminants below are part of the wire contract.

use serde::{Deserialize, Serialize};

/// The labelled state of a field.
///
/// Only one automatic transition exists: decoherence moves
/// [`QuantumState::Superposition`] to [`QuantumState::Ground`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum QuantumState {
    Ground = 0,
    Excited = 1,
    Coherent = 2,
    Superposition = 3,
    Entangled = 4,
    Collapsed = 5,
}

/// Raised when an ordinal does not name a [`QuantumState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown quantum state ordinal: {0}")]
pub struct UnknownStateError(pub i64);

impl QuantumState {
    /// Every state in ordinal order.
    pub const ALL: [QuantumState; 6] = [
        Self::Ground,
        Self::Excited,
        Self::Coherent,
        Self::Superposition,
        Self::Entangled,
        Self::Collapsed,
    ];

    /// Returns the wire ordinal.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Look up a state by ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStateError`] for ordinals outside `0..=5`.
    pub fn from_ordinal(ordinal: i64) -> Result<Self, UnknownStateError> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(UnknownStateError(ordinal))
    }

    /// States counted by the coherence ratio.
    #[must_use]
    pub const fn is_coherent(self) -> bool {
        matches!(self, Self::Coherent | Self::Superposition)
    }

    /// States counted as active mechanical devices.
    #[must_use]
    pub const fn drives_device(self) -> bool {
        matches!(self, Self::Excited | Self::Entangled)
    }
}

impl From<QuantumState> for u8 {
    fn from(state: QuantumState) -> Self {
        state.ordinal()
    }
}

impl TryFrom<u8> for QuantumState {
    type Error = UnknownStateError;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(i64::from(ordinal))
    }
}

impl std::fmt::Display for QuantumState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ground => "ground",
            Self::Excited => "excited",
            Self::Coherent => "coherent",
            Self::Superposition => "superposition",
            Self::Entangled => "entangled",
            Self::Collapsed => "collapsed",
        };
        f.write_str(name)
    }
}
