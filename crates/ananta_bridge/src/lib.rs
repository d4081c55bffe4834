//! # ananta_bridge
//!
//! The narrow call/event interface between a host runtime and the
//! [`FieldEngine`](ananta_engine::FieldEngine). Host bindings hand over a
//! [`MethodCall`] envelope and get a [`Reply`] back; pushed engine events
//! use the same `{method, arguments}` envelope.
//!
//! This crate provides:
//!
//! - [`methods`] — the method names of the call surface and their error codes.
//! - [`messages`] — envelopes and per-call argument schemas with validation.
//! - [`codec`] — JSON and MessagePack encoding helpers.
//! - [`dispatch`] — the [`Dispatcher`] that routes calls onto the engine.
//! - [`error`] — the bridge error taxonomy.

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod messages;
pub mod methods;

pub use dispatch::Dispatcher;
pub use error::{BridgeError, CodecError, ErrorKind};
pub use messages::{Failure, MethodCall, Reply};
pub use methods::Method;
