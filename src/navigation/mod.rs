//! Navigation system for Beacon
//!
//! This module holds the homing state machine and the contracts of the two
//! collaborators it drives: the measurement source it samples every tick and
//! the actuator it commands.

mod controller;
mod planner;

pub use controller::HomingController;
pub use planner::{Effect, Phase, Step, step};

use crate::core::Measurement;
use thiserror::Error;

/// Directional motor command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Rotate counter-clockwise in place
    TurnLeft,
    /// Rotate clockwise in place
    TurnRight,
    /// Drive straight ahead
    MoveForward,
    /// Halt all motion
    Stop,
}

impl Command {
    /// Turn toward the side the target is on. Only a negative bearing turns
    /// left; zero turns right.
    pub fn toward(angle: f64) -> Self {
        if angle < 0.0 {
            Command::TurnLeft
        } else {
            Command::TurnRight
        }
    }
}

/// Produces the freshest target observation on request.
///
/// `Ok(None)` means the target is not visible, which is the normal
/// not-yet-found state. `Err` is reserved for faults.
pub trait MeasurementSource {
    /// Samples the world once. May block for one detection cycle.
    fn sample(&mut self) -> Result<Option<Measurement>, NavigationError>;
}

/// Fire-and-forget motor directives. Every command must be idempotent.
pub trait Actuator {
    /// Rotate left
    fn turn_left(&mut self) -> Result<(), NavigationError>;
    /// Rotate right
    fn turn_right(&mut self) -> Result<(), NavigationError>;
    /// Drive forward
    fn move_forward(&mut self) -> Result<(), NavigationError>;
    /// Halt
    fn stop(&mut self) -> Result<(), NavigationError>;

    /// Dispatches a [`Command`] to the matching directive.
    fn execute(&mut self, command: Command) -> Result<(), NavigationError> {
        match command {
            Command::TurnLeft => self.turn_left(),
            Command::TurnRight => self.turn_right(),
            Command::MoveForward => self.move_forward(),
            Command::Stop => self.stop(),
        }
    }
}

impl<S: MeasurementSource + ?Sized> MeasurementSource for Box<S> {
    fn sample(&mut self) -> Result<Option<Measurement>, NavigationError> {
        (**self).sample()
    }
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn turn_left(&mut self) -> Result<(), NavigationError> {
        (**self).turn_left()
    }

    fn turn_right(&mut self) -> Result<(), NavigationError> {
        (**self).turn_right()
    }

    fn move_forward(&mut self) -> Result<(), NavigationError> {
        (**self).move_forward()
    }

    fn stop(&mut self) -> Result<(), NavigationError> {
        (**self).stop()
    }
}

/// Collaborator faults raised mid-loop. These terminate the loop.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The measurement source failed
    #[error("measurement source fault: {0}")]
    Source(String),
    /// The actuator failed
    #[error("actuator fault: {0}")]
    Actuator(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-45.0, Command::TurnLeft)]
    #[case(-0.001, Command::TurnLeft)]
    #[case(0.0, Command::TurnRight)]
    #[case(-0.0, Command::TurnRight)]
    #[case(12.5, Command::TurnRight)]
    fn turns_toward_target_side(#[case] angle: f64, #[case] expected: Command) {
        assert_eq!(Command::toward(angle), expected);
    }
}
