//! Collaborator stand-ins for the homing controller
//!
//! Measurement sources and actuators that satisfy the navigation contracts
//! without owning any camera or motor driver themselves:
//! - `ReplaySource` replays a scripted measurement sequence
//! - `TagSource` turns tag poses from a detector into measurements
//! - `LoggingActuator` and `MovementGate` log and gate motor commands

mod motors;
mod replay;
mod tag;

pub use motors::{LoggingActuator, MovementGate};
pub use replay::ReplaySource;
pub use tag::{TagDetector, TagSource};
