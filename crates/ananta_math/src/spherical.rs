//! Spherical source coordinates.
//!
//! [`SphericalCoord`] places a sound source under the projection dome:
//! radial distance, polar angle, azimuth, and a height offset above the dome
//! floor.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A position in dome space.
///
/// Angles are in radians. `height` lifts the source along the dome axis and
/// is independent of the spherical triple.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SphericalCoord {
    /// Radial distance from the dome centre.
    pub r: f64,
    /// Polar angle measured from the dome axis.
    pub theta: f64,
    /// Azimuthal angle.
    pub phi: f64,
    /// Offset along the dome axis.
    pub height: f64,
}

impl SphericalCoord {
    /// The dome centre.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a coordinate from its four components.
    #[must_use]
    pub const fn new(r: f64, theta: f64, phi: f64, height: f64) -> Self {
        Self {
            r,
            theta,
            phi,
            height,
        }
    }

    /// Convert to Cartesian space with the dome axis on `z`.
    #[must_use]
    pub fn to_cartesian(&self) -> DVec3 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        DVec3::new(
            self.r * sin_theta * cos_phi,
            self.r * sin_theta * sin_phi,
            self.r * cos_theta + self.height,
        )
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.theta.is_finite() && self.phi.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_origin_maps_to_zero() {
        assert_eq!(SphericalCoord::ORIGIN.to_cartesian(), DVec3::ZERO);
    }

    #[test]
    fn test_axis_point_adds_height() {
        let p = SphericalCoord::new(2.0, 0.0, 0.0, 5.0).to_cartesian();
        assert!((p - DVec3::new(0.0, 0.0, 7.0)).length() < 1e-12);
    }

    #[test]
    fn test_equator_point() {
        let p = SphericalCoord::new(1.0, FRAC_PI_2, FRAC_PI_2, 0.0).to_cartesian();
        assert!((p - DVec3::new(0.0, 1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_non_finite_detected() {
        assert!(SphericalCoord::new(1.0, 0.0, 0.0, 0.0).is_finite());
        assert!(!SphericalCoord::new(f64::NAN, 0.0, 0.0, 0.0).is_finite());
        assert!(!SphericalCoord::new(1.0, 0.0, 0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let p = SphericalCoord::new(1.5, 0.25, -0.75, 3.0);
        let bytes = rmp_serde::to_vec(&p).unwrap();
        let restored: SphericalCoord = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(p, restored);
    }
}
