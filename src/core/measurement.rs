// core/measurement.rs

// Target observations and the tolerance predicates evaluated against them.
// A measurement lives for exactly one control tick; nothing here caches it.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One observation of the target relative to the unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Range to the target (millimetres by convention)
    pub distance: f64,
    /// Bearing error in degrees, positive when the target is to the right
    pub angle: f64,
}

impl Measurement {
    /// Creates a measurement from a range and a bearing error.
    pub fn new(distance: f64, angle: f64) -> Self {
        Measurement { distance, angle }
    }

    /// Builds a measurement from a tag translation in the camera frame
    /// (x to the right, z along the optical axis).
    pub fn from_translation(translation: &Vector3<f64>) -> Self {
        Measurement {
            distance: translation.norm(),
            angle: translation.x.atan2(translation.z).to_degrees(),
        }
    }

    /// True when both fields are finite and the distance is non-negative.
    pub fn is_valid(&self) -> bool {
        self.distance.is_finite() && self.angle.is_finite() && self.distance >= 0.0
    }
}

/// Thresholds within which the target counts as reached or aligned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Maximum distance considered "reached"
    pub linear: f64,
    /// Maximum absolute bearing error considered "aligned"
    pub angular: f64,
}

impl Tolerances {
    /// Creates a tolerance pair.
    pub fn new(linear: f64, angular: f64) -> Self {
        Tolerances { linear, angular }
    }

    /// Closed on the boundary: `distance <= linear`.
    pub fn is_reached(&self, measurement: &Measurement) -> bool {
        measurement.distance <= self.linear
    }

    /// Closed on the boundary: `|angle| <= angular`.
    pub fn is_aligned(&self, measurement: &Measurement) -> bool {
        measurement.angle.abs() <= self.angular
    }

    /// Checks that both tolerances are finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        if !self.linear.is_finite() || self.linear < 0.0 {
            return Err(format!("linear tolerance must be >= 0, got {}", self.linear));
        }
        if !self.angular.is_finite() || self.angular < 0.0 {
            return Err(format!("angular tolerance must be >= 0, got {}", self.angular));
        }
        Ok(())
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            linear: 400.0,
            angular: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(399.0, true)]
    #[case(400.0, true)]
    #[case(400.5, false)]
    fn reached_is_closed_on_boundary(#[case] distance: f64, #[case] expected: bool) {
        let tolerances = Tolerances::new(400.0, 10.0);
        assert_eq!(tolerances.is_reached(&Measurement::new(distance, 0.0)), expected);
    }

    #[rstest]
    #[case(10.0, true)]
    #[case(-10.0, true)]
    #[case(10.01, false)]
    #[case(-45.0, false)]
    fn aligned_is_closed_on_boundary(#[case] angle: f64, #[case] expected: bool) {
        let tolerances = Tolerances::new(400.0, 10.0);
        assert_eq!(tolerances.is_aligned(&Measurement::new(1000.0, angle)), expected);
    }

    #[test]
    fn translation_to_the_right_gives_positive_angle() {
        let m = Measurement::from_translation(&Vector3::new(300.0, 0.0, 400.0));
        assert!((m.distance - 500.0).abs() < 1e-9);
        assert!((m.angle - 36.869_897_645).abs() < 1e-6);

        let left = Measurement::from_translation(&Vector3::new(-300.0, 0.0, 400.0));
        assert!(left.angle < 0.0);
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(100.0, f64::INFINITY)]
    #[case(-1.0, 0.0)]
    fn rejects_invalid_measurements(#[case] distance: f64, #[case] angle: f64) {
        assert!(!Measurement::new(distance, angle).is_valid());
    }

    #[test]
    fn rejects_negative_tolerances() {
        assert!(Tolerances::new(-1.0, 10.0).validate().is_err());
        assert!(Tolerances::new(400.0, f64::NAN).validate().is_err());
        assert!(Tolerances::new(0.0, 0.0).validate().is_ok());
    }
}
