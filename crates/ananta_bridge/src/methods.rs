//! Method names of the host call surface.
//!
//! Names and error codes are shared with the existing mobile UI runtime and
//! must not change.

use std::fmt;
use std::str::FromStr;

use crate::error::BridgeError;

/// Error code for calls whose method name is unknown.
pub const NOT_IMPLEMENTED_CODE: &str = "NOT_IMPLEMENTED";

/// Error code for envelopes that could not be decoded at all.
pub const INVALID_CALL_CODE: &str = "INVALID_CALL";

/// A method of the synchronous call surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Store dome geometry and start the background loop.
    Initialize,
    /// Build a field without storing it.
    CreateQuantumSoundField,
    /// Apply noise and store a field.
    ProcessSoundField,
    /// Append an interference record.
    AddInterferenceField,
    /// Run one decoherence pass.
    UpdateSystem,
    /// Read current statistics.
    GetStatistics,
    /// Set the engine-wide uncertainty.
    SetQuantumUncertainty,
    /// Read every stored field.
    GetFields,
    /// Clear registry and ledger.
    Reset,
    /// Stop the background loop.
    Dispose,
}

impl Method {
    /// Every method, in call-surface order.
    pub const ALL: [Method; 10] = [
        Self::Initialize,
        Self::CreateQuantumSoundField,
        Self::ProcessSoundField,
        Self::AddInterferenceField,
        Self::UpdateSystem,
        Self::GetStatistics,
        Self::SetQuantumUncertainty,
        Self::GetFields,
        Self::Reset,
        Self::Dispose,
    ];

    /// The wire name of this method.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::CreateQuantumSoundField => "createQuantumSoundField",
            Self::ProcessSoundField => "processSoundField",
            Self::AddInterferenceField => "addInterferenceField",
            Self::UpdateSystem => "updateSystem",
            Self::GetStatistics => "getStatistics",
            Self::SetQuantumUncertainty => "setQuantumUncertainty",
            Self::GetFields => "getFields",
            Self::Reset => "reset",
            Self::Dispose => "dispose",
        }
    }

    /// The short failure code reported when this method fails.
    #[must_use]
    pub const fn error_code(self) -> &'static str {
        match self {
            Self::Initialize => "INIT_ERROR",
            Self::CreateQuantumSoundField => "FIELD_CREATION_ERROR",
            Self::ProcessSoundField => "PROCESSING_ERROR",
            Self::AddInterferenceField => "INTERFERENCE_ERROR",
            Self::UpdateSystem => "UPDATE_ERROR",
            Self::GetStatistics => "STATS_ERROR",
            Self::SetQuantumUncertainty => "UNCERTAINTY_ERROR",
            Self::GetFields => "FIELDS_ERROR",
            Self::Reset => "RESET_ERROR",
            Self::Dispose => "DISPOSE_ERROR",
        }
    }

    /// Look up a method by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| BridgeError::NotImplemented(s.to_string()))
    }
}
