//! Broadcaster — pushes engine state to the host on every tick.
//!
//! Each tick produces two independent deliveries to the host's
//! [`EventSink`]: an [`EngineEvent::StatisticsUpdate`] followed by an
//! [`EngineEvent::FieldsUpdate`]. Delivery is fire-and-forget; a failed or
//! panicking delivery is logged and the other delivery still goes out.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};

use ananta_field::{Field, StatisticsSnapshot};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::ledger::InterferenceLedger;
use crate::registry::FieldRegistry;
use crate::statistics;

/// Method name of the statistics push event.
pub const STATISTICS_UPDATE: &str = "onStatisticsUpdate";

/// Method name of the fields push event.
pub const FIELDS_UPDATE: &str = "onFieldsUpdate";

/// A push event delivered to the host.
///
/// Serialises as `{"method": "<name>", "arguments": <payload>}`, the same
/// envelope the host uses for calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "arguments")]
pub enum EngineEvent {
    /// Fresh system-wide statistics.
    #[serde(rename = "onStatisticsUpdate")]
    StatisticsUpdate(StatisticsSnapshot),
    /// Full registry contents.
    #[serde(rename = "onFieldsUpdate")]
    FieldsUpdate(Vec<Field>),
}

impl EngineEvent {
    /// The host-side method name of this event.
    #[must_use]
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::StatisticsUpdate(_) => STATISTICS_UPDATE,
            Self::FieldsUpdate(_) => FIELDS_UPDATE,
        }
    }
}

/// Errors a sink may report for a single delivery.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Nobody is subscribed to the channel.
    #[error("no subscribers are listening")]
    NoSubscribers,

    /// The sink has been closed by the host.
    #[error("event sink closed")]
    Closed,

    /// Writing the event failed.
    #[error("failed to write event: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the event failed.
    #[error("failed to encode event: {0}")]
    Encode(String),

    /// The sink's buffer is full and the event was dropped.
    #[error("event sink is full, event dropped")]
    Full,

    /// The sink panicked while delivering.
    #[error("event sink panicked: {0}")]
    Panicked(String),
}

/// The host's notification channel.
///
/// Implementations must not block for long: deliveries run on the tick loop.
pub trait EventSink: Send + Sync {
    /// Deliver one event. No acknowledgement is expected beyond the result.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the event could not be handed to the host.
    fn deliver(&self, event: &EngineEvent) -> Result<(), SinkError>;
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn deliver(&self, _event: &EngineEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink backed by a tokio broadcast channel, for in-process subscribers.
///
/// Slow subscribers lag and lose the oldest events rather than holding up
/// the tick loop.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: broadcast::Sender<EngineEvent>,
}

impl ChannelSink {
    /// Create a channel sink buffering up to `capacity` events per
    /// subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, event: &EngineEvent) -> Result<(), SinkError> {
        self.tx
            .send(event.clone())
            .map(|_| ())
            .map_err(|_| SinkError::NoSubscribers)
    }
}

/// Delivery counts for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Events the sink accepted.
    pub delivered: usize,
    /// Events the sink rejected.
    pub failed: usize,
}

/// Publishes registry and statistics events to an [`EventSink`].
///
/// Clones share one delivery gate: every delivery holds it, and
/// [`Broadcaster::wait_idle`] takes it to wait out a delivery in flight.
#[derive(Clone)]
pub struct Broadcaster {
    sink: Arc<dyn EventSink>,
    gate: Arc<Mutex<()>>,
}

impl fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster").finish_non_exhaustive()
    }
}

impl Broadcaster {
    /// Create a broadcaster delivering to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Block until no delivery is in progress.
    ///
    /// Once `cancel` has fired, a delivery that has not started by the time
    /// this returns never starts.
    pub fn wait_idle(&self) {
        drop(self.gate.lock().unwrap_or_else(PoisonError::into_inner));
    }

    /// Snapshot the registry, aggregate statistics, and deliver both events.
    ///
    /// Stops before any delivery that would start after `cancel` fires.
    pub fn publish(
        &self,
        registry: &FieldRegistry,
        ledger: &InterferenceLedger,
        cancel: &CancellationToken,
    ) -> BroadcastReport {
        let fields = registry.snapshot_all();
        let stats = statistics::aggregate(&fields, ledger);
        let mut report = BroadcastReport::default();

        for event in [
            EngineEvent::StatisticsUpdate(stats),
            EngineEvent::FieldsUpdate(fields),
        ] {
            let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
            if cancel.is_cancelled() {
                break;
            }
            match self.deliver(&event) {
                Ok(()) => report.delivered += 1,
                Err(SinkError::NoSubscribers) => {
                    debug!(event = event.method_name(), "no subscribers for event");
                    report.failed += 1;
                }
                Err(e) => {
                    warn!(event = event.method_name(), error = %e, "event delivery failed");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Deliver a single event, turning a sink panic into an error.
    fn deliver(&self, event: &EngineEvent) -> Result<(), SinkError> {
        catch_unwind(AssertUnwindSafe(|| self.sink.deliver(event)))
            .unwrap_or_else(|payload| Err(SinkError::Panicked(panic_message(payload.as_ref()))))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
