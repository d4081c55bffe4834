//! The engine façade.
//!
//! [`FieldEngine`] is an explicit instance owning the shared
//! [`EngineState`] and the handle of its background [`TickLoop`]. Host
//! adapters translate their native call convention onto these methods.

use std::sync::{Arc, Mutex, PoisonError};

use ananta_field::{Field, FieldKey, InterferenceField, QuantumState, StatisticsSnapshot};
use ananta_math::SphericalCoord;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::broadcast::{Broadcaster, EventSink};
use crate::config::{DomeGeometry, EngineConfig};
use crate::decoherence::DecoherenceReport;
use crate::error::EngineError;
use crate::state::EngineState;
use crate::tick::TickLoop;

/// A running background loop.
#[derive(Debug)]
struct BackgroundTask {
    cancel: CancellationToken,
    handle: JoinHandle<u64>,
    broadcaster: Broadcaster,
}

/// The acoustic field engine.
///
/// Every method takes `&self`; wrap the engine in an [`Arc`] to share it
/// between host threads. Dropping the engine cancels its background loop.
pub struct FieldEngine {
    /// Unique identifier for log correlation.
    instance_id: Uuid,
    config: EngineConfig,
    state: Arc<EngineState>,
    sink: Arc<dyn EventSink>,
    task: Mutex<Option<BackgroundTask>>,
}

impl std::fmt::Debug for FieldEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldEngine")
            .field("instance_id", &self.instance_id)
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FieldEngine {
    /// Create an engine that will push events to `sink` once initialised.
    #[must_use]
    pub fn new(config: EngineConfig, sink: Arc<dyn EventSink>) -> Self {
        let state = Arc::new(EngineState::new(&config));
        let instance_id = Uuid::new_v4();
        debug!(%instance_id, "field engine created");
        Self {
            instance_id,
            config,
            state,
            sink,
            task: Mutex::new(None),
        }
    }

    /// Returns the unique instance ID of this engine.
    #[must_use]
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the shared state.
    #[must_use]
    pub fn state(&self) -> &Arc<EngineState> {
        &self.state
    }

    /// Store the dome geometry and start the background tick loop.
    ///
    /// Calling this while a loop is running cancels that loop and starts a
    /// fresh one, so at most one loop is ever live. Registry and ledger
    /// contents are kept.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDome`] for negative or non-finite
    /// dimensions and [`EngineError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn initialize(&self, dome: DomeGeometry) -> Result<(), EngineError> {
        if !dome.is_valid() {
            return Err(EngineError::InvalidDome {
                radius: dome.radius,
                height: dome.height,
            });
        }
        let runtime = tokio::runtime::Handle::try_current()?;

        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = task.take() {
            info!(instance_id = %self.instance_id, "restarting tick loop");
            previous.cancel.cancel();
        }

        self.state.set_dome(dome);

        let cancel = CancellationToken::new();
        let broadcaster = Broadcaster::new(Arc::clone(&self.sink));
        let tick_loop = TickLoop::new(
            self.config.tick_config(),
            Arc::clone(&self.state),
            broadcaster.clone(),
        );
        let handle = runtime.spawn(tick_loop.run(cancel.clone()));
        *task = Some(BackgroundTask {
            cancel,
            handle,
            broadcaster,
        });

        info!(
            instance_id = %self.instance_id,
            dome_radius = dome.radius,
            dome_height = dome.height,
            "field engine initialised"
        );
        Ok(())
    }

    /// Returns `true` while a background loop is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.cancel.is_cancelled() && !task.handle.is_finished())
    }

    /// Build a new field with unit amplitude, zero phase, and the current
    /// timestamp. The field is not stored.
    #[must_use]
    pub fn create_field(
        &self,
        frequency: f64,
        position: SphericalCoord,
        state: QuantumState,
    ) -> Field {
        Field::new(frequency, position, state)
    }

    /// Apply noise at the current uncertainty and store the field, replacing
    /// any field at the same key. Returns the field as stored.
    pub fn process_field(&self, field: Field) -> Field {
        let stored = self.state.process(field);
        debug!(key = %stored.key(), state = %stored.state, "field processed");
        stored
    }

    /// Append an interference record to the ledger.
    pub fn add_interference_field(&self, field: InterferenceField) {
        debug!(pairs = field.pair_count(), "interference field added");
        self.state.add_interference(field);
    }

    /// Run one decoherence pass now.
    ///
    /// `dt` is accepted for call compatibility; decoherence is counted per
    /// pass, not scaled by elapsed time.
    pub fn update_system(&self, dt: f64) -> DecoherenceReport {
        let report = self
            .state
            .decohere(self.config.decoherence_probability);
        debug!(dt, collapsed = report.collapsed, "manual decoherence pass");
        report
    }

    /// Current statistics.
    #[must_use]
    pub fn statistics(&self) -> StatisticsSnapshot {
        self.state.statistics()
    }

    /// Copy every stored field.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        self.state.registry().snapshot_all()
    }

    /// Look up a stored field.
    #[must_use]
    pub fn field(&self, key: &FieldKey) -> Option<Field> {
        self.state.registry().get(key)
    }

    /// Clamp `value` to `[0, 1]` and make it the engine-wide uncertainty.
    /// Returns the stored value.
    pub fn set_quantum_uncertainty(&self, value: f64) -> f64 {
        let stored = self.state.set_uncertainty(value);
        debug!(requested = value, stored, "quantum uncertainty set");
        stored
    }

    /// Current engine-wide uncertainty.
    #[must_use]
    pub fn quantum_uncertainty(&self) -> f64 {
        self.state.uncertainty()
    }

    /// Current dome geometry.
    #[must_use]
    pub fn dome(&self) -> DomeGeometry {
        self.state.dome()
    }

    /// Clear the registry and the ledger.
    pub fn reset(&self) {
        self.state.reset();
        info!(instance_id = %self.instance_id, "field engine reset");
    }

    /// Stop the background loop without waiting for the task to finish.
    ///
    /// Returns `true` if a loop was running. A delivery already in progress
    /// is waited out, so no event reaches the sink once this returns. The
    /// task itself winds down at its next suspension point; use
    /// [`FieldEngine::shutdown`] to join it.
    pub fn teardown(&self) -> bool {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match task {
            Some(task) => {
                task.cancel.cancel();
                task.broadcaster.wait_idle();
                info!(instance_id = %self.instance_id, "tick loop cancelled");
                true
            }
            None => false,
        }
    }

    /// Stop the background loop and wait for it to finish.
    ///
    /// After this returns no further ticks or deliveries happen.
    pub async fn shutdown(&self) {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(task) = task else {
            return;
        };
        task.cancel.cancel();
        match task.handle.await {
            Ok(ticks) => info!(instance_id = %self.instance_id, ticks, "field engine shut down"),
            Err(e) => warn!(instance_id = %self.instance_id, error = %e, "tick loop ended abnormally"),
        }
    }
}

impl Drop for FieldEngine {
    fn drop(&mut self) {
        let task = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.cancel.cancel();
        }
    }
}
