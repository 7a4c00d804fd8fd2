//! Beacon - tag-homing navigation for autonomous ground units
//!
//! This library provides the homing controller that finds a visually tagged
//! target, turns to face it and drives toward it until it is within reach,
//! together with the status register, configuration and the collaborator
//! stand-ins used by the `beacon` binary.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod config;
pub mod core;
pub mod devices;
pub mod navigation;
#[cfg(feature = "ros")]
pub mod ros_interface;

// Re-export commonly used items for easier access
pub use config::Settings;
pub use self::core::{
    CameraCalibration, Measurement, Status, StatusHandle, StatusSnapshot, StatusTransition,
    Tolerances,
};
pub use devices::{LoggingActuator, MovementGate, ReplaySource, TagDetector, TagSource};
pub use navigation::{
    Actuator, Command, Effect, HomingController, MeasurementSource, NavigationError, Phase, Step,
};

use thiserror::Error;

/// Beacon error types
#[derive(Error, Debug)]
pub enum BeaconError {
    /// Settings could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),
    /// Camera calibration artifact missing or malformed
    #[error("Calibration unavailable: {0}")]
    Calibration(String),
    /// Measurement source or actuator fault raised mid-loop
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// ROS 2 interface error
    #[cfg(feature = "ros")]
    #[error("ROS error: {0}")]
    Ros(String),
}

impl From<serde_yaml::Error> for BeaconError {
    fn from(e: serde_yaml::Error) -> Self {
        BeaconError::Config(e.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, BeaconError>;
