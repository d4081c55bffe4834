//! Engine error types.

/// Errors returned by [`FieldEngine`](crate::FieldEngine) lifecycle
/// operations. Field and ledger operations are infallible.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `initialize` was called outside a tokio runtime, so the tick loop
    /// has nowhere to run.
    #[error("no tokio runtime available to run the tick loop: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// A dome dimension was negative or not finite.
    #[error("invalid dome geometry: radius {radius}, height {height}")]
    InvalidDome {
        /// Rejected radius.
        radius: f64,
        /// Rejected height.
        height: f64,
    },
}
