//! # ananta_engine
//!
//! The acoustic field simulation engine. A [`FieldEngine`] owns:
//!
//! - a [`FieldRegistry`] of field records keyed by position,
//! - an append-only [`InterferenceLedger`],
//! - a background [`TickLoop`] that decoheres fields and pushes
//!   [`EngineEvent`]s to the host's [`EventSink`] on a fixed cadence.
//!
//! All façade operations are synchronous and may be called from any thread
//! while the tick loop runs. Only [`FieldEngine::initialize`] needs a tokio
//! runtime, to spawn the loop.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ananta_engine::{ChannelSink, EngineConfig, FieldEngine};
//! use ananta_field::QuantumState;
//! use ananta_math::SphericalCoord;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sink = Arc::new(ChannelSink::new(64));
//!     let mut events = sink.subscribe();
//!     let engine = FieldEngine::new(EngineConfig::default(), sink);
//!     engine.initialize(Default::default()).unwrap();
//!
//!     let field = engine.create_field(440.0, SphericalCoord::new(1.0, 0.0, 0.0, 0.0), QuantumState::Superposition);
//!     engine.process_field(field);
//!
//!     let _event = events.recv().await;
//!     engine.shutdown().await;
//! }
//! ```

pub mod broadcast;
pub mod config;
pub mod decoherence;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod state;
pub mod statistics;
pub mod tick;

pub use broadcast::{BroadcastReport, Broadcaster, ChannelSink, EngineEvent, EventSink, NullSink, SinkError};
pub use config::{DomeGeometry, EngineConfig, TickConfig};
pub use decoherence::{DecoherenceReport, decohere};
pub use engine::FieldEngine;
pub use error::EngineError;
pub use ledger::InterferenceLedger;
pub use registry::{FieldRegistry, apply_noise};
pub use state::EngineState;
pub use tick::{TickLoop, TickReport};
