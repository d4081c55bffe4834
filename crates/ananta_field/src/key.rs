//! Registry key derivation.
//!
//! A [`FieldKey`] is derived from the `(r, theta, phi)` triple of a field's
//! position and rendered as `"r_theta_phi"`. `height` does not take part, so
//! two fields that differ only in height share a key.

use std::fmt;

use ananta_math::SphericalCoord;
use serde::{Deserialize, Serialize};

/// The registry key of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    /// Derive the key for a position.
    ///
    /// Components are rendered with their shortest round-trip decimal form
    /// and always carry a fractional part (`1.0`, not `1`), matching the keys
    /// the mobile bindings have always produced.
    #[must_use]
    pub fn from_position(position: &SphericalCoord) -> Self {
        Self(format!(
            "{:?}_{:?}_{:?}",
            position.r, position.theta, position.phi
        ))
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&SphericalCoord> for FieldKey {
    fn from(position: &SphericalCoord) -> Self {
        Self::from_position(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let key = FieldKey::from_position(&SphericalCoord::new(1.0, 0.5, 0.0, 3.0));
        assert_eq!(key.as_str(), "1.0_0.5_0.0");
    }

    #[test]
    fn test_height_ignored() {
        let low = FieldKey::from_position(&SphericalCoord::new(2.0, 0.1, 0.2, 0.0));
        let high = FieldKey::from_position(&SphericalCoord::new(2.0, 0.1, 0.2, 9.0));
        assert_eq!(low, high);
    }

    #[test]
    fn test_angles_distinguish_keys() {
        let a = FieldKey::from_position(&SphericalCoord::new(1.0, 0.1, 0.2, 0.0));
        let b = FieldKey::from_position(&SphericalCoord::new(1.0, 0.2, 0.1, 0.0));
        assert_ne!(a, b);
    }
}
