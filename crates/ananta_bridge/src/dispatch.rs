//! Routes host calls onto a [`FieldEngine`].
//!
//! Calls:
//!
//!   initialize               — store dome geometry, start the background loop
//!   createQuantumSoundField  — build a field without storing it
//!   processSoundField        — apply noise, store the field
//!   addInterferenceField     — append an interference record
//!   updateSystem             — run one decoherence pass
//!   getStatistics            — read the current statistics snapshot
//!   setQuantumUncertainty    — set the engine-wide uncertainty
//!   getFields                — read every stored field
//!   reset                    — clear registry and ledger
//!   dispose                  — stop the background loop and wait out any delivery

use std::sync::Arc;

use ananta_engine::FieldEngine;
use ananta_field::{Field, InterferenceField};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::codec;
use crate::error::{BridgeError, ErrorKind};
use crate::messages::{
    CreateFieldArgs, Failure, InitializeArgs, MethodCall, Reply, UncertaintyArgs, UpdateArgs,
    Validate, decode_args,
};
use crate::methods::{INVALID_CALL_CODE, Method, NOT_IMPLEMENTED_CODE};

/// Dispatches [`MethodCall`]s to a shared engine.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    engine: Arc<FieldEngine>,
}

impl Dispatcher {
    /// Create a dispatcher routing calls to `engine`.
    #[must_use]
    pub fn new(engine: Arc<FieldEngine>) -> Self {
        Self { engine }
    }

    /// The engine calls are routed to.
    #[must_use]
    pub fn engine(&self) -> &Arc<FieldEngine> {
        &self.engine
    }

    /// Handle one call. Never fails: errors are reported in the reply.
    pub fn handle(&self, call: &MethodCall) -> Reply {
        let Some(method) = Method::from_name(&call.method) else {
            warn!(method = %call.method, "unknown method");
            let error = BridgeError::NotImplemented(call.method.clone());
            return Reply::error(Failure::from_error(NOT_IMPLEMENTED_CODE, &error))
                .with_id(call.id.clone());
        };

        debug!(%method, "handling call");
        let reply = match self.invoke(method, &call.arguments) {
            Ok(value) => Reply::ok(value),
            Err(e) => {
                warn!(%method, kind = ?e.kind(), error = %e, "call failed");
                Reply::error(Failure::from_error(method.error_code(), &e))
            }
        };
        reply.with_id(call.id.clone())
    }

    /// Handle a JSON-encoded call and return the JSON-encoded reply.
    pub fn handle_json(&self, text: &str) -> String {
        let reply = match codec::decode_json::<MethodCall>(text) {
            Ok(call) => self.handle(&call),
            Err(e) => invalid_call(e.to_string()),
        };
        codec::encode_json(&reply).unwrap_or_else(|e| {
            warn!(error = %e, "failed to encode reply");
            r#"{"error":{"code":"INVALID_CALL","kind":"internal_fault","message":"reply encoding failed"}}"#
                .to_string()
        })
    }

    /// Handle a MessagePack-encoded call and return the MessagePack-encoded
    /// reply.
    pub fn handle_msgpack(&self, bytes: &[u8]) -> Vec<u8> {
        let reply = match codec::decode_msgpack::<MethodCall>(bytes) {
            Ok(call) => self.handle(&call),
            Err(e) => invalid_call(e.to_string()),
        };
        codec::encode_msgpack(&reply).unwrap_or_else(|e| {
            warn!(error = %e, "failed to encode reply");
            Vec::new()
        })
    }

    fn invoke(&self, method: Method, arguments: &Value) -> Result<Value, BridgeError> {
        match method {
            Method::Initialize => {
                let args: InitializeArgs = decode_args(arguments)?;
                args.validate()?;
                self.engine.initialize(args.dome())?;
                Ok(json!({
                    "success": true,
                    "message": "field engine initialized",
                }))
            }
            Method::CreateQuantumSoundField => {
                let args: CreateFieldArgs = decode_args(arguments)?;
                args.validate()?;
                let field = self
                    .engine
                    .create_field(args.frequency, args.position, args.state);
                to_value(&field)
            }
            Method::ProcessSoundField => {
                let field: Field = decode_args(arguments)?;
                field.validate()?;
                self.engine.process_field(field);
                Ok(json!({ "success": true }))
            }
            Method::AddInterferenceField => {
                let record: InterferenceField = decode_args(arguments)?;
                record.validate()?;
                self.engine.add_interference_field(record);
                Ok(json!({ "success": true }))
            }
            Method::UpdateSystem => {
                let args: UpdateArgs = decode_args(arguments)?;
                args.validate()?;
                let report = self.engine.update_system(args.dt);
                Ok(json!({ "success": true, "collapsed": report.collapsed }))
            }
            Method::GetStatistics => to_value(&self.engine.statistics()),
            Method::SetQuantumUncertainty => {
                let args: UncertaintyArgs = decode_args(arguments)?;
                args.validate()?;
                let stored = self.engine.set_quantum_uncertainty(args.uncertainty);
                Ok(json!({ "success": true, "uncertainty": stored }))
            }
            Method::GetFields => to_value(&self.engine.fields()),
            Method::Reset => {
                self.engine.reset();
                Ok(json!({ "success": true }))
            }
            Method::Dispose => {
                let was_running = self.engine.teardown();
                Ok(json!({ "success": true, "wasRunning": was_running }))
            }
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, BridgeError> {
    serde_json::to_value(value).map_err(|e| BridgeError::InternalFault(e.to_string()))
}

fn invalid_call(detail: String) -> Reply {
    warn!(error = %detail, "undecodable call envelope");
    Reply::error(Failure {
        code: INVALID_CALL_CODE.to_string(),
        kind: ErrorKind::InvalidArgument,
        message: format!("invalid call: {detail}"),
    })
}

#[cfg(test)]
mod tests {
    use ananta_engine::{DomeGeometry, EngineConfig, NullSink};
    use ananta_field::StatisticsSnapshot;

    use super::*;

    fn dispatcher() -> Dispatcher {
        let config = EngineConfig::default().with_seed(7);
        Dispatcher::new(Arc::new(FieldEngine::new(config, Arc::new(NullSink))))
    }

    fn call(d: &Dispatcher, method: &str, arguments: Value) -> Reply {
        d.handle(&MethodCall::new(method, arguments))
    }

    fn origin_field(state: i64) -> Value {
        json!({
            "frequency": 440.0,
            "position": { "r": 1.0, "theta": 0.0, "phi": 0.0, "height": 0.0 },
            "quantumState": state,
            "amplitude": { "real": 1.0, "imaginary": 0.0 },
            "phase": 0.0,
            "timestamp": 0,
        })
    }

    #[tokio::test]
    async fn test_end_to_end_flow() {
        let d = dispatcher();

        let reply = call(&d, "initialize", json!({ "domeRadius": 10.0, "domeHeight": 5.0 }));
        assert!(reply.is_ok(), "{reply:?}");

        let reply = call(&d, "setQuantumUncertainty", json!({ "uncertainty": 0.0 }));
        assert_eq!(reply.ok.unwrap()["uncertainty"], 0.0);

        let reply = call(
            &d,
            "createQuantumSoundField",
            json!({
                "frequency": 440.0,
                "position": { "r": 1.0, "theta": 0.0, "phi": 0.0, "height": 0.0 },
                "state": 3,
            }),
        );
        let field = reply.ok.unwrap();
        assert_eq!(field["quantumState"], 3);
        assert_eq!(field["amplitude"]["real"], 1.0);

        // Creating does not store.
        let stats: StatisticsSnapshot =
            serde_json::from_value(call(&d, "getStatistics", Value::Null).ok.unwrap()).unwrap();
        assert_eq!(stats.active_fields, 0);

        let reply = call(&d, "processSoundField", field);
        assert!(reply.is_ok(), "{reply:?}");

        let stats: StatisticsSnapshot =
            serde_json::from_value(call(&d, "getStatistics", Value::Null).ok.unwrap()).unwrap();
        assert_eq!(stats.active_fields, 1);
        assert_eq!(stats.coherence_ratio, 1.0);
        assert_eq!(stats.active_device_count, 0);

        let fields = call(&d, "getFields", Value::Null).ok.unwrap();
        assert_eq!(fields.as_array().map(Vec::len), Some(1));
        assert_eq!(fields[0]["amplitude"]["real"], 1.0);

        let reply = call(&d, "dispose", Value::Null);
        assert_eq!(reply.ok.unwrap()["wasRunning"], true);
        d.engine().shutdown().await;
    }

    #[test]
    fn test_unknown_method_is_not_implemented() {
        let d = dispatcher();
        let reply = d.handle(&MethodCall::new("warpDrive", Value::Null).with_id(3));
        let failure = reply.error.unwrap();
        assert_eq!(failure.code, NOT_IMPLEMENTED_CODE);
        assert_eq!(failure.kind, ErrorKind::NotImplemented);
        assert_eq!(reply.id, Some(json!(3)));
    }

    #[test]
    fn test_missing_argument_uses_method_code() {
        let d = dispatcher();
        let failure = call(&d, "updateSystem", json!({})).error.unwrap();
        assert_eq!(failure.code, "UPDATE_ERROR");
        assert_eq!(failure.kind, ErrorKind::InvalidArgument);

        let failure = call(&d, "setQuantumUncertainty", Value::Null).error.unwrap();
        assert_eq!(failure.code, "UNCERTAINTY_ERROR");
    }

    #[test]
    fn test_uncertainty_is_clamped() {
        let d = dispatcher();
        let ok = call(&d, "setQuantumUncertainty", json!({ "uncertainty": 3.5 }))
            .ok
            .unwrap();
        assert_eq!(ok["uncertainty"], 1.0);
        let ok = call(&d, "setQuantumUncertainty", json!({ "uncertainty": -2 }))
            .ok
            .unwrap();
        assert_eq!(ok["uncertainty"], 0.0);
        assert_eq!(d.engine().quantum_uncertainty(), 0.0);
    }

    #[test]
    fn test_initialize_outside_runtime_is_internal_fault() {
        let d = dispatcher();
        let failure = call(&d, "initialize", Value::Null).error.unwrap();
        assert_eq!(failure.code, "INIT_ERROR");
        assert_eq!(failure.kind, ErrorKind::InternalFault);
    }

    #[tokio::test]
    async fn test_initialize_with_null_dome_uses_defaults() {
        let d = dispatcher();
        let reply = call(&d, "initialize", json!({ "domeRadius": null }));
        assert!(reply.is_ok(), "{reply:?}");
        assert_eq!(d.engine().dome(), DomeGeometry::new(10.0, 5.0));
        d.engine().shutdown().await;
    }

    #[tokio::test]
    async fn test_dispose_reports_running_loop() {
        let d = dispatcher();
        call(&d, "initialize", Value::Null);
        assert_eq!(call(&d, "dispose", Value::Null).ok.unwrap()["wasRunning"], true);
        assert_eq!(call(&d, "dispose", Value::Null).ok.unwrap()["wasRunning"], false);
        assert!(!d.engine().is_running());
    }

    #[tokio::test]
    async fn test_negative_dome_is_invalid_argument() {
        let d = dispatcher();
        let failure = call(&d, "initialize", json!({ "domeRadius": -1.0 }))
            .error
            .unwrap();
        assert_eq!(failure.kind, ErrorKind::InvalidArgument);
        assert!(!d.engine().is_running());
    }

    #[test]
    fn test_same_position_replaces_field() {
        let d = dispatcher();
        call(&d, "setQuantumUncertainty", json!({ "uncertainty": 0.0 }));
        assert!(call(&d, "processSoundField", origin_field(0)).is_ok());
        assert!(call(&d, "processSoundField", origin_field(4)).is_ok());

        let fields = call(&d, "getFields", Value::Null).ok.unwrap();
        assert_eq!(fields.as_array().map(Vec::len), Some(1));
        assert_eq!(fields[0]["quantumState"], 4);
    }

    #[test]
    fn test_interference_counts_pairs() {
        let d = dispatcher();
        call(&d, "processSoundField", origin_field(4));
        let record = json!({
            "type": 1,
            "center": { "r": 0.0, "theta": 0.0, "phi": 0.0, "height": 0.0 },
            "fieldRadius": 2.0,
            "sourceFields": [origin_field(4)],
            "entangledPairs": [{ "first": 0, "second": 1 }, { "first": 1, "second": 2 }],
        });
        assert!(call(&d, "addInterferenceField", record).is_ok());

        let stats = call(&d, "getStatistics", Value::Null).ok.unwrap();
        assert_eq!(stats["entangledPairs"], 2);
        assert_eq!(stats["qrdConnected"], true);
    }

    #[test]
    fn test_update_collapses_only_superposition() {
        let d = dispatcher();
        call(&d, "setQuantumUncertainty", json!({ "uncertainty": 0.0 }));
        call(&d, "processSoundField", origin_field(2));
        for _ in 0..200 {
            let ok = call(&d, "updateSystem", json!({ "dt": 0.1 })).ok.unwrap();
            assert_eq!(ok["collapsed"], 0);
        }
        let fields = call(&d, "getFields", Value::Null).ok.unwrap();
        assert_eq!(fields[0]["quantumState"], 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let d = dispatcher();
        call(&d, "processSoundField", origin_field(3));
        assert!(call(&d, "reset", Value::Null).is_ok());
        let stats = call(&d, "getStatistics", Value::Null).ok.unwrap();
        assert_eq!(stats["activeFields"], 0);
        assert_eq!(stats["energyEfficiency"], 1.0);
    }

    #[test]
    fn test_json_round_trip_and_bad_envelope() {
        let d = dispatcher();
        let text = d.handle_json(r#"{"id":"a","method":"getStatistics"}"#);
        let reply: Reply = serde_json::from_str(&text).unwrap();
        assert!(reply.is_ok());
        assert_eq!(reply.id, Some(json!("a")));

        let text = d.handle_json("not json");
        let reply: Reply = serde_json::from_str(&text).unwrap();
        assert_eq!(reply.error.unwrap().code, INVALID_CALL_CODE);
    }

    #[test]
    fn test_msgpack_call() {
        let d = dispatcher();
        let bytes = codec::encode_msgpack(&MethodCall::new(
            "setQuantumUncertainty",
            json!({ "uncertainty": 0.25 }),
        ))
        .unwrap();
        let reply: Reply = codec::decode_msgpack(&d.handle_msgpack(&bytes)).unwrap();
        assert_eq!(reply.ok.unwrap()["uncertainty"], 0.25);
    }
}
