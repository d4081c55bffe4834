//! Engine and tick loop configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default interval between background ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Default per-tick probability that a superposed field decoheres.
pub const DEFAULT_DECOHERENCE_PROBABILITY: f64 = 0.05;

/// Default engine-wide quantum uncertainty.
pub const DEFAULT_UNCERTAINTY: f64 = 0.1;

/// Physical dimensions of the projection dome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomeGeometry {
    /// Dome radius in metres.
    pub radius: f64,
    /// Dome height in metres.
    pub height: f64,
}

impl DomeGeometry {
    /// Create a dome with the given radius and height.
    #[must_use]
    pub const fn new(radius: f64, height: f64) -> Self {
        Self { radius, height }
    }

    /// Returns `true` if both dimensions are finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.radius.is_finite() && self.height.is_finite() && self.radius >= 0.0 && self.height >= 0.0
    }
}

impl Default for DomeGeometry {
    fn default() -> Self {
        Self::new(10.0, 5.0)
    }
}

/// Configuration for a [`FieldEngine`](crate::FieldEngine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interval between background ticks.
    pub tick_interval: Duration,
    /// Per-tick decoherence probability for each superposed field, in `[0, 1]`.
    pub decoherence_probability: f64,
    /// Quantum uncertainty in effect until the host sets one.
    pub initial_uncertainty: f64,
    /// Whether the background loop runs a decoherence pass on every tick.
    /// When `false` decoherence only happens through `update_system`.
    pub background_decoherence: bool,
    /// Maximum number of background ticks (0 = unlimited).
    pub max_ticks: u64,
    /// Seed for the engine's random source. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Dome geometry in effect until `initialize` supplies one.
    pub dome: DomeGeometry,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            decoherence_probability: DEFAULT_DECOHERENCE_PROBABILITY,
            initial_uncertainty: DEFAULT_UNCERTAINTY,
            background_decoherence: true,
            max_ticks: 0,
            seed: None,
            dome: DomeGeometry::default(),
        }
    }
}

impl EngineConfig {
    /// Override the tick interval. Zero is raised to one millisecond.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Override the decoherence probability, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_decoherence_probability(mut self, probability: f64) -> Self {
        self.decoherence_probability = clamp_unit(probability);
        self
    }

    /// Override the initial uncertainty, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_initial_uncertainty(mut self, uncertainty: f64) -> Self {
        self.initial_uncertainty = clamp_unit(uncertainty);
        self
    }

    /// Enable or disable decoherence on background ticks.
    #[must_use]
    pub fn with_background_decoherence(mut self, enabled: bool) -> Self {
        self.background_decoherence = enabled;
        self
    }

    /// Stop the background loop after `max_ticks` ticks.
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Seed the random source for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The tick loop's share of this configuration.
    #[must_use]
    pub fn tick_config(&self) -> TickConfig {
        TickConfig {
            tick_interval: self.tick_interval,
            max_ticks: self.max_ticks,
            decoherence_probability: self.decoherence_probability,
            background_decoherence: self.background_decoherence,
        }
    }
}

/// Configuration for the background tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Interval between ticks.
    pub tick_interval: Duration,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Per-tick decoherence probability.
    pub decoherence_probability: f64,
    /// Whether each tick runs a decoherence pass.
    pub background_decoherence: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        EngineConfig::default().tick_config()
    }
}

/// Clamp to `[0, 1]`, mapping NaN to zero.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
