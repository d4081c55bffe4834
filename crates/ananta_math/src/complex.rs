//! Complex amplitude value type.

use serde::{Deserialize, Serialize};

/// A complex number in rectangular form.
///
/// Field amplitudes are stored as `Complex`; the engine only ever reads the
/// derived [`magnitude`](Complex::magnitude) and [`phase`](Complex::phase).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    /// Real component.
    pub real: f64,
    /// Imaginary component.
    pub imaginary: f64,
}

impl Complex {
    /// Zero amplitude.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Unit real amplitude, the initial amplitude of every new field.
    pub const ONE: Self = Self::new(1.0, 0.0);

    /// Create a complex number from its rectangular components.
    #[must_use]
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }

    /// Euclidean norm, `sqrt(re² + im²)`.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.real.hypot(self.imaginary)
    }

    /// Argument in radians, `atan2(im, re)`.
    #[must_use]
    pub fn phase(self) -> f64 {
        self.imaginary.atan2(self.real)
    }

    /// Add the same real scalar to both components.
    #[must_use]
    pub fn shifted(self, offset: f64) -> Self {
        Self::new(self.real + offset, self.imaginary + offset)
    }

    /// Returns `true` if both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.real.is_finite() && self.imaginary.is_finite()
    }
}

impl Default for Complex {
    fn default() -> Self {
        Self::ZERO
    }
}
