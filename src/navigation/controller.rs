// src/navigation/controller.rs
// Drives the homing state machine against real collaborators: samples the
// measurement source once per tick, applies the resulting effects to the
// actuator and the status register, and repeats until cancelled.

use crossbeam_channel::Receiver;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::planner::{Effect, Phase, Step, step};
use super::{Actuator, Command, MeasurementSource};
use crate::core::{Status, StatusHandle, StatusRegister, StatusTransition, Tolerances};
use crate::{BeaconError, Result};

/// Homing controller: the only writer of motion intent and status.
pub struct HomingController<S, A> {
    source: S,
    actuator: A,
    tolerances: Tolerances,
    phase: Phase,
    register: StatusRegister,
    ticks: u64,
    tick_interval: Option<Duration>,
}

impl<S: MeasurementSource, A: Actuator> HomingController<S, A> {
    /// Creates a controller in `Initializing`. Fails if the tolerances are
    /// not usable.
    pub fn new(source: S, actuator: A, tolerances: Tolerances) -> Result<Self> {
        tolerances.validate().map_err(BeaconError::Config)?;

        Ok(HomingController {
            source,
            actuator,
            tolerances,
            phase: Phase::default(),
            register: StatusRegister::new(),
            ticks: 0,
            tick_interval: None,
        })
    }

    /// Sleeps for `interval` after every tick.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = (!interval.is_zero()).then_some(interval);
        self
    }

    /// Runs one control pass on a fresh sample.
    pub fn tick(&mut self) -> Result<Step> {
        self.ticks += 1;

        let sample = self.source.sample()?.filter(|m| {
            let valid = m.is_valid();
            if !valid {
                warn!("Discarding invalid measurement {:?}", m);
            }
            valid
        });

        let next = step(self.phase, sample, &self.tolerances);
        debug!(
            "tick {}: {:?} {:?} -> {:?}",
            self.ticks, self.phase, sample, next.phase
        );

        for effect in &next.effects {
            match *effect {
                Effect::Command(command) => self.actuator.execute(command)?,
                Effect::Status(status) => {
                    self.register.set(status, self.ticks);
                }
            }
        }
        self.phase = next.phase;

        Ok(next)
    }

    /// Runs until `running` is cleared or `limit` ticks have elapsed.
    /// Returns the number of ticks executed by this call.
    ///
    /// The flag is checked at the top of every pass. A cancelled run issues
    /// a final `stop`; a collaborator fault ends the run with its error.
    pub fn run(&mut self, running: &AtomicBool, limit: Option<u64>) -> Result<u64> {
        info!(
            "Starting homing (linear tolerance {}, angular tolerance {})",
            self.tolerances.linear, self.tolerances.angular
        );

        let mut executed = 0;
        loop {
            if !running.load(Ordering::SeqCst) {
                info!("Homing cancelled after {} ticks", executed);
                self.actuator.execute(Command::Stop)?;
                break;
            }
            if limit.is_some_and(|limit| executed >= limit) {
                info!("Homing tick limit reached ({})", executed);
                break;
            }

            self.tick()?;
            executed += 1;

            if let Some(interval) = self.tick_interval {
                std::thread::sleep(interval);
            }
        }

        info!("Homing finished in status {}", self.status());
        Ok(executed)
    }

    /// Current status
    pub fn status(&self) -> Status {
        self.register.current()
    }

    /// Read-only status handle for telemetry
    pub fn status_handle(&self) -> StatusHandle {
        self.register.handle()
    }

    /// Subscribes to status transitions
    pub fn subscribe(&mut self) -> Receiver<StatusTransition> {
        self.register.subscribe()
    }

    /// Phase the next tick resumes from
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks executed since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Configured tolerances
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// The measurement source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Releases the collaborators
    pub fn into_parts(self) -> (S, A) {
        (self.source, self.actuator)
    }
}

// Current Functionality:
// - One sample per tick, never reused across ticks.
// - Effects applied strictly in the order the state machine produced them.
// - Cooperative cancellation at the top of each pass, followed by a stop.
