// core/mod.rs

// Declares and exposes the data model shared by the controller and its
// collaborators: measurements and tolerances, the status register, and the
// camera calibration artifact that gates startup.

pub mod calibration;
pub mod measurement;
pub mod state;

// Re-export key types for a unified API
pub use calibration::CameraCalibration;
pub use measurement::{Measurement, Tolerances};
pub use state::{Status, StatusHandle, StatusRegister, StatusSnapshot, StatusTransition};
