// src/config.rs
// Runtime settings loaded from YAML. Every field has a default so a partial
// file (or no file at all) still yields a usable configuration.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::Tolerances;
use crate::{BeaconError, Result};

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Camera device and calibration artifact
    pub camera: CameraSettings,
    /// Target tag geometry
    pub tag: TagSettings,
    /// Motor behaviour
    pub motor: MotorSettings,
    /// Controller tolerances and pacing
    pub control: ControlSettings,
    /// ROS 2 topics and speeds
    pub ros: RosSettings,
}

/// Camera settings, handed to the detection pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Video device index
    pub device_id: u32,
    /// Capture width in pixels
    pub frame_width: u32,
    /// Capture height in pixels
    pub frame_height: u32,
    /// Path of the calibration JSON; the loop never starts without it
    pub calibration_path: PathBuf,
}

/// Target tag settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagSettings {
    /// AprilTag family name
    pub family: String,
    /// Tag edge length, same unit as the linear tolerance
    pub size: f64,
}

/// Motor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorSettings {
    /// When false only `stop` reaches the motors
    pub enable_movement: bool,
}

/// Controller settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Reached/aligned thresholds
    pub tolerance: Tolerances,
    /// Pause after each tick in milliseconds (0 = none)
    pub tick_interval_ms: u64,
}

/// ROS 2 settings, used with the `ros` feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosSettings {
    /// Node name
    pub node_name: String,
    /// Velocity command topic
    pub cmd_vel_topic: String,
    /// Status transition topic
    pub status_topic: String,
    /// Forward speed in m/s
    pub linear_speed: f64,
    /// Turn rate in rad/s
    pub angular_speed: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            device_id: 8,
            frame_width: 1280,
            frame_height: 720,
            calibration_path: PathBuf::from("calibration.json"),
        }
    }
}

impl Default for TagSettings {
    fn default() -> Self {
        TagSettings {
            family: "tag36h11".to_string(),
            size: 120.0,
        }
    }
}

impl Default for RosSettings {
    fn default() -> Self {
        RosSettings {
            node_name: "beacon".to_string(),
            cmd_vel_topic: "/cmd_vel".to_string(),
            status_topic: "/beacon/status".to_string(),
            linear_speed: 0.15,
            angular_speed: 0.5,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "{} not found, using default configuration",
                path.display()
            );
            return Ok(Settings::default());
        }

        let file = File::open(path)?;
        let settings: Settings = serde_yaml::from_reader(file)?;
        settings.validate()?;
        info!("{} loaded", path.display());
        Ok(settings)
    }

    /// Parses settings from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.control
            .tolerance
            .validate()
            .map_err(BeaconError::Config)?;
        if !(self.tag.size > 0.0) {
            return Err(BeaconError::Config(format!(
                "tag size must be positive, got {}",
                self.tag.size
            )));
        }
        Ok(())
    }

    /// Pause between ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.control.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_field_robot() {
        let settings = Settings::default();
        assert_eq!(settings.control.tolerance, Tolerances::new(400.0, 10.0));
        assert_eq!(settings.camera.device_id, 8);
        assert!(!settings.motor.enable_movement);
        assert_eq!(settings.tick_interval(), Duration::ZERO);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_yaml(
            "control:\n  tolerance:\n    linear: 250\n    angular: 5\nmotor:\n  enable_movement: true\n",
        )
        .unwrap();

        assert_eq!(settings.control.tolerance, Tolerances::new(250.0, 5.0));
        assert!(settings.motor.enable_movement);
        assert_eq!(settings.tag.family, "tag36h11");
        assert_eq!(settings.ros.cmd_vel_topic, "/cmd_vel");
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let err = Settings::from_yaml("control:\n  tolerance:\n    linear: -5\n    angular: 10\n")
            .unwrap_err();
        assert!(matches!(err, BeaconError::Config(_)));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = Settings::from_yaml("control: [not, a, map]").unwrap_err();
        assert!(matches!(err, BeaconError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("beacon-settings-does-not-exist.yaml");
        assert_eq!(Settings::load(path).unwrap(), Settings::default());
    }
}
