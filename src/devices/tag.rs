// src/devices/tag.rs
// Bridges a tag detector to the measurement contract. The detector owns the
// camera and the pose estimation; this adapter only converts the reported
// tag translation into range and bearing.

use nalgebra::Vector3;

use crate::core::{CameraCalibration, Measurement};
use crate::navigation::{MeasurementSource, NavigationError};

/// Per-frame tag detection with pose estimation.
pub trait TagDetector {
    /// Captures one frame and returns the target tag translation in the
    /// camera frame (x right, y down, z forward), or `None` if no target tag
    /// is visible.
    fn detect(
        &mut self,
        calibration: &CameraCalibration,
    ) -> Result<Option<Vector3<f64>>, NavigationError>;
}

/// Measurement source backed by a tag detector.
///
/// Building one requires loaded intrinsics, so an uncalibrated camera can
/// never feed the controller.
pub struct TagSource<D> {
    detector: D,
    calibration: CameraCalibration,
}

impl<D: TagDetector> TagSource<D> {
    /// Pairs a detector with the intrinsics it estimates poses with.
    pub fn new(detector: D, calibration: CameraCalibration) -> Self {
        TagSource {
            detector,
            calibration,
        }
    }

    /// Intrinsics in use
    pub fn calibration(&self) -> &CameraCalibration {
        &self.calibration
    }
}

impl<D: TagDetector> MeasurementSource for TagSource<D> {
    fn sample(&mut self) -> Result<Option<Measurement>, NavigationError> {
        let translation = self.detector.detect(&self.calibration)?;
        Ok(translation.as_ref().map(Measurement::from_translation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix3;

    struct FixedDetector(Vec<Option<Vector3<f64>>>);

    impl TagDetector for FixedDetector {
        fn detect(
            &mut self,
            calibration: &CameraCalibration,
        ) -> Result<Option<Vector3<f64>>, NavigationError> {
            assert!(calibration.fx > 0.0);
            if self.0.is_empty() {
                return Err(NavigationError::Source("camera disconnected".into()));
            }
            Ok(self.0.remove(0))
        }
    }

    fn calibration() -> CameraCalibration {
        CameraCalibration::from_matrix(Matrix3::new(
            900.0, 0.0, 640.0,
            0.0, 900.0, 360.0,
            0.0, 0.0, 1.0,
        ))
        .unwrap()
    }

    #[test]
    fn converts_translation_to_measurement() {
        let detector = FixedDetector(vec![None, Some(Vector3::new(-500.0, 20.0, 500.0))]);
        let mut source = TagSource::new(detector, calibration());

        assert_eq!(source.sample().unwrap(), None);

        let m = source.sample().unwrap().unwrap();
        assert!((m.angle + 45.0).abs() < 1e-9);
        assert!((m.distance - (500_000.0f64 + 400.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn detector_faults_propagate() {
        let mut source = TagSource::new(FixedDetector(vec![]), calibration());
        assert!(matches!(source.sample(), Err(NavigationError::Source(_))));
    }
}
