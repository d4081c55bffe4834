//! Call envelopes, per-call argument schemas, and replies.
//!
//! Every call crosses the boundary as `{"method": ..., "arguments": ...}`
//! with an optional correlation `id`. Arguments are decoded into a typed
//! request and validated before anything reaches the engine, so the engine
//! itself only ever sees well-formed, finite values.

use ananta_engine::DomeGeometry;
use ananta_field::{Field, InterferenceField, QuantumState};
use ananta_math::SphericalCoord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, ErrorKind};

/// A call from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Optional correlation id echoed back in the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method arguments. Absent arguments decode as `null`.
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    /// Build a call without a correlation id.
    #[must_use]
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: None,
            method: method.into(),
            arguments,
        }
    }

    /// Attach a correlation id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A structured failure reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// Short per-method code (e.g. `"PROCESSING_ERROR"`).
    pub code: String,
    /// Failure class.
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl Failure {
    /// Build a failure from a bridge error and a code.
    #[must_use]
    pub fn from_error(code: &str, error: &BridgeError) -> Self {
        Self {
            code: code.to_string(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// The reply to a [`MethodCall`]: exactly one of `ok` or `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Correlation id copied from the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Result value on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<Value>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Failure>,
}

impl Reply {
    /// A successful reply.
    #[must_use]
    pub fn ok(value: Value) -> Self {
        Self {
            id: None,
            ok: Some(value),
            error: None,
        }
    }

    /// A failed reply.
    #[must_use]
    pub fn error(failure: Failure) -> Self {
        Self {
            id: None,
            ok: None,
            error: Some(failure),
        }
    }

    /// Attach the correlation id of the originating call.
    #[must_use]
    pub fn with_id(mut self, id: Option<Value>) -> Self {
        self.id = id;
        self
    }

    /// Returns `true` for a successful reply.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

// ---------------------------------------------------------------------------
// Argument schemas
// ---------------------------------------------------------------------------

/// Arguments of `initialize`.
///
/// Both members are optional; an absent or `null` member takes the default
/// dome dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeArgs {
    /// Dome radius in metres.
    #[serde(default)]
    pub dome_radius: Option<f64>,
    /// Dome height in metres.
    #[serde(default)]
    pub dome_height: Option<f64>,
}

impl InitializeArgs {
    /// The requested dome, with defaults filled in.
    #[must_use]
    pub fn dome(&self) -> DomeGeometry {
        let default = DomeGeometry::default();
        DomeGeometry::new(
            self.dome_radius.unwrap_or(default.radius),
            self.dome_height.unwrap_or(default.height),
        )
    }
}

/// Arguments of `createQuantumSoundField`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CreateFieldArgs {
    /// Oscillator frequency in hertz.
    pub frequency: f64,
    /// Source position under the dome.
    pub position: SphericalCoord,
    /// State ordinal.
    pub state: QuantumState,
}

/// Arguments of `updateSystem`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct UpdateArgs {
    /// Seconds since the previous update. Accepted but not used.
    pub dt: f64,
}

/// Arguments of `setQuantumUncertainty`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct UncertaintyArgs {
    /// Requested uncertainty; clamped to `[0, 1]` by the engine.
    pub uncertainty: f64,
}

/// Decode call arguments into a typed request.
///
/// `null` arguments decode like an empty object, so schemas whose members
/// all have defaults accept a missing payload.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidArgument`] if a member is missing or
/// mistyped.
pub fn decode_args<T: DeserializeOwned>(arguments: &Value) -> Result<T, BridgeError> {
    let value = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments.clone()
    };
    Ok(serde_json::from_value(value)?)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject non-finite numbers before they reach the engine.
pub trait Validate {
    /// Check every numeric member.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArgument`] naming the first bad member.
    fn validate(&self) -> Result<(), BridgeError>;
}

fn ensure_finite(name: &str, value: f64) -> Result<(), BridgeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BridgeError::InvalidArgument(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}

fn validate_position(name: &str, position: &SphericalCoord) -> Result<(), BridgeError> {
    ensure_finite(&format!("{name}.r"), position.r)?;
    ensure_finite(&format!("{name}.theta"), position.theta)?;
    ensure_finite(&format!("{name}.phi"), position.phi)?;
    ensure_finite(&format!("{name}.height"), position.height)
}

impl Validate for InitializeArgs {
    fn validate(&self) -> Result<(), BridgeError> {
        if let Some(radius) = self.dome_radius {
            ensure_finite("domeRadius", radius)?;
        }
        if let Some(height) = self.dome_height {
            ensure_finite("domeHeight", height)?;
        }
        Ok(())
    }
}

impl Validate for CreateFieldArgs {
    fn validate(&self) -> Result<(), BridgeError> {
        ensure_finite("frequency", self.frequency)?;
        validate_position("position", &self.position)
    }
}

impl Validate for UpdateArgs {
    fn validate(&self) -> Result<(), BridgeError> {
        ensure_finite("dt", self.dt)
    }
}

impl Validate for UncertaintyArgs {
    fn validate(&self) -> Result<(), BridgeError> {
        ensure_finite("uncertainty", self.uncertainty)
    }
}

impl Validate for Field {
    fn validate(&self) -> Result<(), BridgeError> {
        ensure_finite("frequency", self.frequency)?;
        validate_position("position", &self.position)?;
        ensure_finite("amplitude.real", self.amplitude.real)?;
        ensure_finite("amplitude.imaginary", self.amplitude.imaginary)?;
        ensure_finite("phase", self.phase)
    }
}

impl Validate for InterferenceField {
    fn validate(&self) -> Result<(), BridgeError> {
        validate_position("center", &self.center)?;
        ensure_finite("fieldRadius", self.radius)?;
        for (i, field) in self.source_fields.iter().enumerate() {
            field.validate().map_err(|e| match e {
                BridgeError::InvalidArgument(msg) => {
                    BridgeError::InvalidArgument(format!("sourceFields[{i}]: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_call_envelope_defaults() {
        let call: MethodCall = serde_json::from_value(json!({ "method": "getStatistics" })).unwrap();
        assert_eq!(call.method, "getStatistics");
        assert!(call.arguments.is_null());
        assert!(call.id.is_none());
    }

    #[test]
    fn test_initialize_defaults() {
        let args: InitializeArgs = decode_args(&Value::Null).unwrap();
        assert_eq!(args.dome(), DomeGeometry::new(10.0, 5.0));
        let args: InitializeArgs = decode_args(&json!({ "domeRadius": 20 })).unwrap();
        assert_eq!(args.dome(), DomeGeometry::new(20.0, 5.0));
    }

    #[test]
    fn test_initialize_null_members_take_defaults() {
        let args: InitializeArgs =
            decode_args(&json!({ "domeRadius": null, "domeHeight": 7.5 })).unwrap();
        args.validate().unwrap();
        assert_eq!(args.dome(), DomeGeometry::new(10.0, 7.5));

        let args: InitializeArgs =
            decode_args(&json!({ "domeRadius": null, "domeHeight": null })).unwrap();
        assert_eq!(args.dome(), DomeGeometry::default());
    }

    #[test]
    fn test_initialize_mistyped_member_is_invalid_argument() {
        let result: Result<InitializeArgs, _> = decode_args(&json!({ "domeRadius": "wide" }));
        assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    }

    #[test]
    fn test_create_args_decode() {
        let args: CreateFieldArgs = decode_args(&json!({
            "frequency": 440.0,
            "position": { "r": 1.0, "theta": 0.0, "phi": 0.0, "height": 0.0 },
            "state": 3,
        }))
        .unwrap();
        assert_eq!(args.state, QuantumState::Superposition);
        args.validate().unwrap();
    }

    #[test]
    fn test_missing_member_is_invalid_argument() {
        let result: Result<CreateFieldArgs, _> = decode_args(&json!({ "frequency": 440.0 }));
        assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    }

    #[test]
    fn test_mistyped_member_is_invalid_argument() {
        let result: Result<UpdateArgs, _> = decode_args(&json!({ "dt": "fast" }));
        assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    }

    #[test]
    fn test_unknown_state_is_invalid_argument() {
        let result: Result<CreateFieldArgs, _> = decode_args(&json!({
            "frequency": 440.0,
            "position": { "r": 1.0, "theta": 0.0, "phi": 0.0, "height": 0.0 },
            "state": 17,
        }));
        assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let args = UncertaintyArgs {
            uncertainty: f64::NAN,
        };
        assert!(matches!(args.validate(), Err(BridgeError::InvalidArgument(_))));

        let mut field = Field::new(440.0, SphericalCoord::ORIGIN, QuantumState::Ground);
        field.amplitude.imaginary = f64::INFINITY;
        let err = field.validate().unwrap_err();
        assert!(err.to_string().contains("amplitude.imaginary"));
    }

    #[test]
    fn test_interference_names_bad_source_field() {
        let mut bad = Field::new(440.0, SphericalCoord::ORIGIN, QuantumState::Ground);
        bad.phase = f64::NAN;
        let record = InterferenceField {
            kind: 0,
            center: SphericalCoord::ORIGIN,
            radius: 1.0,
            source_fields: vec![Field::new(1.0, SphericalCoord::ORIGIN, QuantumState::Ground), bad],
            entangled_pairs: Vec::new(),
        };
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("sourceFields[1]"));
    }

    #[test]
    fn test_reply_shapes() {
        let ok = Reply::ok(json!({ "success": true })).with_id(Some(json!(7)));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "id": 7, "ok": { "success": true } })
        );

        let failure = Failure::from_error(
            "UPDATE_ERROR",
            &BridgeError::InvalidArgument("dt missing".into()),
        );
        let err = Reply::error(failure);
        assert!(!err.is_ok());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({ "error": {
                "code": "UPDATE_ERROR",
                "kind": "invalid_argument",
                "message": "invalid argument: dt missing",
            }})
        );
    }
}
