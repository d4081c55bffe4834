//! Bridge error types.

use ananta_engine::EngineError;
use serde::{Deserialize, Serialize};

/// The failure classes reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A payload member was missing, mistyped, or out of range.
    InvalidArgument,
    /// Something unexpected went wrong while processing.
    InternalFault,
    /// The method name is unknown.
    NotImplemented,
}

/// Errors produced while handling a host call. None are retried.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A payload member was missing, mistyped, or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Something unexpected went wrong while processing.
    #[error("internal fault: {0}")]
    InternalFault(String),

    /// The method name is unknown.
    #[error("method not implemented: {0}")]
    NotImplemented(String),
}

impl BridgeError {
    /// The failure class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InternalFault(_) => ErrorKind::InternalFault,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

impl From<EngineError> for BridgeError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidDome { .. } => Self::InvalidArgument(e.to_string()),
            EngineError::NoRuntime(_) => Self::InternalFault(e.to_string()),
        }
    }
}

/// Errors from the wire codecs.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Failed to encode to JSON or decode from JSON.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode a message to MessagePack.
    #[error("failed to encode message: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a message from MessagePack.
    #[error("failed to decode message: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            BridgeError::InvalidArgument("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            BridgeError::InternalFault("x".into()).kind(),
            ErrorKind::InternalFault
        );
    }

    #[test]
    fn test_engine_errors_map_to_kinds() {
        let dome = BridgeError::from(EngineError::InvalidDome {
            radius: -1.0,
            height: 5.0,
        });
        assert_eq!(dome.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::InvalidArgument).unwrap(),
            "\"invalid_argument\""
        );
    }
}
