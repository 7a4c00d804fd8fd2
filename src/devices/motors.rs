// src/devices/motors.rs
// Motor-side stand-ins. LoggingActuator records and logs every directive;
// MovementGate wraps any actuator and lets only `stop` through while
// movement is disabled in the settings.

use log::{debug, info};
use std::collections::VecDeque;

use crate::navigation::{Actuator, Command, NavigationError};

const HISTORY_CAPACITY: usize = 100;

/// Actuator that logs commands and keeps the most recent ones.
#[derive(Debug, Default)]
pub struct LoggingActuator {
    history: VecDeque<Command>,
    issued: u64,
}

impl LoggingActuator {
    /// Creates an actuator with empty history.
    pub fn new() -> Self {
        LoggingActuator {
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            issued: 0,
        }
    }

    /// Most recent commands, oldest first (at most 100).
    pub fn history(&self) -> &VecDeque<Command> {
        &self.history
    }

    /// Total commands issued, including those dropped from history.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    fn record(&mut self, command: Command) -> Result<(), NavigationError> {
        info!("Motor command: {:?}", command);
        if self.history.len() >= HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(command);
        self.issued += 1;
        Ok(())
    }
}

impl Actuator for LoggingActuator {
    fn turn_left(&mut self) -> Result<(), NavigationError> {
        self.record(Command::TurnLeft)
    }

    fn turn_right(&mut self) -> Result<(), NavigationError> {
        self.record(Command::TurnRight)
    }

    fn move_forward(&mut self) -> Result<(), NavigationError> {
        self.record(Command::MoveForward)
    }

    fn stop(&mut self) -> Result<(), NavigationError> {
        self.record(Command::Stop)
    }
}

/// Suppresses directional commands while movement is disabled.
pub struct MovementGate<A> {
    inner: A,
    enabled: bool,
    suppressed: u64,
}

impl<A: Actuator> MovementGate<A> {
    /// Wraps `inner`; directional commands pass only when `enabled`.
    pub fn new(inner: A, enabled: bool) -> Self {
        if !enabled {
            info!("Motor movement disabled, directional commands will be suppressed");
        }
        MovementGate {
            inner,
            enabled,
            suppressed: 0,
        }
    }

    /// Number of directional commands swallowed so far.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// The wrapped actuator
    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn gate(&mut self, command: Command) -> Result<(), NavigationError> {
        if self.enabled {
            return self.inner.execute(command);
        }
        debug!("Suppressed {:?} (movement disabled)", command);
        self.suppressed += 1;
        Ok(())
    }
}

impl<A: Actuator> Actuator for MovementGate<A> {
    fn turn_left(&mut self) -> Result<(), NavigationError> {
        self.gate(Command::TurnLeft)
    }

    fn turn_right(&mut self) -> Result<(), NavigationError> {
        self.gate(Command::TurnRight)
    }

    fn move_forward(&mut self) -> Result<(), NavigationError> {
        self.gate(Command::MoveForward)
    }

    fn stop(&mut self) -> Result<(), NavigationError> {
        self.inner.stop()
    }
}
