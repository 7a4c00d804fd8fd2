// core/state.rs

// Tracks the controller's externally observable status. The register is
// owned by the controller (its only writer); telemetry reads immutable
// snapshots through a StatusHandle or listens to the transition stream.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

/// Discrete controller status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Set at construction, left on the first tick
    Initializing,
    /// Sweeping for the target
    FindingTarget,
    /// Target came into view while sweeping
    TargetFound,
    /// Turning toward the target
    AligningToTarget,
    /// Bearing error within tolerance
    AlignedToTarget,
    /// Target vanished during or right after alignment
    TargetLost,
    /// Driving toward the target
    MovingTowardsTarget,
    /// Within linear tolerance, holding position
    TargetReached,
}

impl Status {
    /// Wire name of the status, e.g. `TARGET_REACHED`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Initializing => "INITIALIZING",
            Status::FindingTarget => "FINDING_TARGET",
            Status::TargetFound => "TARGET_FOUND",
            Status::AligningToTarget => "ALIGNING_TO_TARGET",
            Status::AlignedToTarget => "ALIGNED_TO_TARGET",
            Status::TargetLost => "TARGET_LOST",
            Status::MovingTowardsTarget => "MOVING_TOWARDS_TARGET",
            Status::TargetReached => "TARGET_REACHED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable view of the register at one point in time
#[derive(Clone, Debug)]
pub struct StatusSnapshot {
    /// Current status
    pub status: Status,
    /// When the current status was entered
    pub since: Instant,
    /// Tick on which the current status was entered (0 = construction)
    pub tick: u64,
    /// Number of transitions since construction
    pub transitions: u64,
}

/// A status change, published once per actual change
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusTransition {
    /// Previous status
    pub from: Status,
    /// New status
    pub to: Status,
    /// Tick on which the change happened
    pub tick: u64,
    /// When the change happened
    pub at: Instant,
}

/// Read-only handle to the register, cheap to clone and safe to share
#[derive(Clone, Debug)]
pub struct StatusHandle {
    inner: Arc<RwLock<Arc<StatusSnapshot>>>,
}

impl StatusHandle {
    /// Returns the latest published snapshot.
    pub fn snapshot(&self) -> Arc<StatusSnapshot> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the latest published status.
    pub fn current(&self) -> Status {
        self.snapshot().status
    }
}

/// Status register: current value plus transition subscribers
pub struct StatusRegister {
    snapshot: Arc<RwLock<Arc<StatusSnapshot>>>,
    subscribers: Vec<Sender<StatusTransition>>,
}

impl StatusRegister {
    /// Initializes the register in `Initializing`
    pub fn new() -> Self {
        let snapshot = StatusSnapshot {
            status: Status::Initializing,
            since: Instant::now(),
            tick: 0,
            transitions: 0,
        };
        StatusRegister {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            subscribers: Vec::new(),
        }
    }

    /// Current status
    pub fn current(&self) -> Status {
        self.handle().current()
    }

    /// Returns a read-only handle for observers.
    pub fn handle(&self) -> StatusHandle {
        StatusHandle {
            inner: Arc::clone(&self.snapshot),
        }
    }

    /// Registers a new transition listener.
    pub fn subscribe(&mut self) -> Receiver<StatusTransition> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Sets the status. Returns `true` if it changed; repeating the current
    /// status is silent.
    pub fn set(&mut self, status: Status, tick: u64) -> bool {
        let previous = self.handle().snapshot();
        if previous.status == status {
            return false;
        }

        let now = Instant::now();
        let next = Arc::new(StatusSnapshot {
            status,
            since: now,
            tick,
            transitions: previous.transitions + 1,
        });
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = next;

        info!("Status: {} -> {}", previous.status, status);

        let transition = StatusTransition {
            from: previous.status,
            to: status,
            tick,
            at: now,
        };
        self.subscribers.retain(|tx| tx.send(transition).is_ok());
        true
    }
}

impl Default for StatusRegister {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_initializing() {
        let register = StatusRegister::new();
        assert_eq!(register.current(), Status::Initializing);
        assert_eq!(register.handle().snapshot().transitions, 0);
    }

    #[test]
    fn repeated_status_is_silent() {
        let mut register = StatusRegister::new();
        let rx = register.subscribe();

        assert!(register.set(Status::TargetReached, 1));
        assert!(!register.set(Status::TargetReached, 2));
        assert!(!register.set(Status::TargetReached, 3));

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].from, Status::Initializing);
        assert_eq!(events[0].to, Status::TargetReached);
        assert_eq!(events[0].tick, 1);

        let snapshot = register.handle().snapshot();
        assert_eq!(snapshot.transitions, 1);
        assert_eq!(snapshot.tick, 1);
    }

    #[test]
    fn handle_sees_later_writes() {
        let mut register = StatusRegister::new();
        let handle = register.handle();
        let before = handle.snapshot();

        register.set(Status::FindingTarget, 1);

        assert_eq!(before.status, Status::Initializing);
        assert_eq!(handle.current(), Status::FindingTarget);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut register = StatusRegister::new();
        drop(register.subscribe());
        let rx = register.subscribe();

        register.set(Status::FindingTarget, 1);
        register.set(Status::TargetFound, 2);

        assert_eq!(register.subscribers.len(), 1);
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn displays_wire_names() {
        assert_eq!(Status::MovingTowardsTarget.to_string(), "MOVING_TOWARDS_TARGET");
        assert_eq!(
            serde_yaml::to_string(&Status::TargetLost).unwrap().trim(),
            "TARGET_LOST"
        );
    }
}
