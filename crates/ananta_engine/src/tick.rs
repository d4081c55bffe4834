//! Background tick loop.
//!
//! Every tick:
//!
//! 1. Run a decoherence pass (unless disabled in [`TickConfig`]).
//! 2. Broadcast statistics and the full registry to the host.
//! 3. Sleep out the rest of the tick interval, waking early on cancellation.
//!
//! Faults inside a tick are logged and the next tick proceeds. There is no
//! backoff.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::broadcast::{BroadcastReport, Broadcaster};
use crate::config::TickConfig;
use crate::decoherence::DecoherenceReport;
use crate::state::EngineState;

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The tick counter after this tick.
    pub tick_id: u64,
    /// Decoherence outcome.
    pub decoherence: DecoherenceReport,
    /// Delivery outcome.
    pub broadcast: BroadcastReport,
}

/// The engine's background loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Current tick counter.
    tick_id: u64,
    /// Tick configuration.
    config: TickConfig,
    /// State shared with host callers.
    state: Arc<EngineState>,
    /// Event publisher.
    broadcaster: Broadcaster,
}

impl TickLoop {
    /// Create a new tick loop over shared engine state.
    #[must_use]
    pub fn new(config: TickConfig, state: Arc<EngineState>, broadcaster: Broadcaster) -> Self {
        Self {
            tick_id: 0,
            config,
            state,
            broadcaster,
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Run one tick.
    pub fn tick(&mut self, cancel: &CancellationToken) -> TickReport {
        self.tick_id += 1;

        let decoherence = if self.config.background_decoherence {
            self.state.decohere(self.config.decoherence_probability)
        } else {
            DecoherenceReport::default()
        };

        let broadcast =
            self.broadcaster
                .publish(self.state.registry(), self.state.ledger(), cancel);

        debug!(
            tick_id = self.tick_id,
            examined = decoherence.examined,
            collapsed = decoherence.collapsed,
            delivered = broadcast.delivered,
            failed = broadcast.failed,
            "tick complete"
        );

        TickReport {
            tick_id: self.tick_id,
            decoherence,
            broadcast,
        }
    }

    /// Run until `cancel` fires or the configured tick limit is reached.
    ///
    /// Cancellation is observed within one tick interval. Returns the number
    /// of ticks run.
    pub async fn run(mut self, cancel: CancellationToken) -> u64 {
        let tick_duration = self.config.tick_interval.max(Duration::from_millis(1));

        info!(
            interval_ms = tick_duration.as_millis() as u64,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        while !cancel.is_cancelled() {
            let start = Instant::now();
            self.tick(&cancel);

            if self.config.max_ticks > 0 && self.tick_id >= self.config.max_ticks {
                info!(ticks = self.tick_id, "tick limit reached");
                break;
            }

            let elapsed = start.elapsed();
            let remaining = if elapsed < tick_duration {
                tick_duration - elapsed
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
                Duration::ZERO
            };

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(remaining) => {}
            }
        }

        info!(ticks = self.tick_id, "tick loop stopped");
        self.tick_id
    }
}
