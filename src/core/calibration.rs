// core/calibration.rs

// Camera intrinsics produced by the offline chessboard calibration. The
// controller never starts without them: loading is the readiness gate for
// any camera-backed measurement source.

use log::info;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::{BeaconError, Result};

/// Pinhole camera intrinsics
#[derive(Clone, Debug, PartialEq)]
pub struct CameraCalibration {
    /// 3x3 camera matrix `[[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`
    pub camera_matrix: Matrix3<f64>,
    /// Focal length along x, in pixels
    pub fx: f64,
    /// Focal length along y, in pixels
    pub fy: f64,
    /// Principal point x
    pub cx: f64,
    /// Principal point y
    pub cy: f64,
}

// On-disk layout: matrix as row arrays plus the derived parameters.
#[derive(Serialize, Deserialize)]
struct CalibrationFile {
    camera_matrix: [[f64; 3]; 3],
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
}

impl CameraCalibration {
    /// Builds a calibration from a camera matrix, deriving fx/fy/cx/cy.
    pub fn from_matrix(camera_matrix: Matrix3<f64>) -> Result<Self> {
        let calibration = CameraCalibration {
            camera_matrix,
            fx: camera_matrix[(0, 0)],
            fy: camera_matrix[(1, 1)],
            cx: camera_matrix[(0, 2)],
            cy: camera_matrix[(1, 2)],
        };
        calibration.validate()?;
        Ok(calibration)
    }

    /// Loads a calibration artifact. A missing file is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BeaconError::Calibration(format!(
                "{} not found, cannot start homing",
                path.display()
            )));
        }

        let file = File::open(path)?;
        let raw: CalibrationFile = serde_json::from_reader(file)
            .map_err(|e| BeaconError::Calibration(format!("{}: {}", path.display(), e)))?;

        let rows = raw.camera_matrix;
        let camera_matrix = Matrix3::new(
            rows[0][0], rows[0][1], rows[0][2],
            rows[1][0], rows[1][1], rows[1][2],
            rows[2][0], rows[2][1], rows[2][2],
        );
        let calibration = CameraCalibration::from_matrix(camera_matrix)?;

        info!(
            "Calibration loaded from {}: f=({:.1}, {:.1}) c=({:.1}, {:.1})",
            path.display(),
            calibration.fx,
            calibration.fy,
            calibration.cx,
            calibration.cy
        );
        Ok(calibration)
    }

    /// Writes the calibration as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let m = &self.camera_matrix;
        let raw = CalibrationFile {
            camera_matrix: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
            fx: self.fx,
            fy: self.fy,
            cx: self.cx,
            cy: self.cy,
        };
        let file = File::create(path)?;
        serde_json::to_writer(file, &raw)
            .map_err(|e| BeaconError::Calibration(format!("{}: {}", path.display(), e)))?;
        info!("Calibration saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(self.fx > 0.0 && self.fy > 0.0) {
            return Err(BeaconError::Calibration(format!(
                "focal lengths must be positive, got ({}, {})",
                self.fx, self.fy
            )));
        }
        Ok(())
    }
}
