//! # ananta_math
//!
//! Numeric value types for the acoustic field engine. Re-exports the
//! double-precision [`glam`] vector used for Cartesian placement and defines
//! the two engine value types:
//!
//! - [`Complex`] — a field amplitude with derived magnitude and phase.
//! - [`SphericalCoord`] — a source position under the dome.

pub mod complex;
pub mod spherical;

// Re-export glam types for convenience.
pub use glam::DVec3;

pub use complex::Complex;
pub use spherical::SphericalCoord;
