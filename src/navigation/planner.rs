// src/navigation/planner.rs
// Pure homing state machine: one sample in, the ordered effects of one
// control pass out. No I/O happens here, so every transition can be tested
// without a camera or motors.

use super::Command;
use crate::core::{Measurement, Status, Tolerances};

/// Where the controller is within the search/align/approach cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Top of the pass: the next sample goes through reached-check, search
    /// and alignment from scratch.
    #[default]
    Evaluate,
    /// A search turn was issued; the next sample decides whether the sweep
    /// continues.
    Searching,
    /// An alignment turn was issued; the next sample decides whether the
    /// heading is good, still off, or the target was lost.
    Aligning,
}

/// One side effect of a control pass, in issue order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Write the status register
    Status(Status),
    /// Send a command to the actuator
    Command(Command),
}

/// Result of feeding one sample to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Phase to resume from on the next sample
    pub phase: Phase,
    /// Effects to apply, in order
    pub effects: Vec<Effect>,
}

impl Step {
    /// Commands in this step, in issue order.
    pub fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Command(command) => Some(*command),
            Effect::Status(_) => None,
        })
    }

    /// Status writes in this step, in order.
    pub fn statuses(&self) -> impl Iterator<Item = Status> + '_ {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Status(status) => Some(*status),
            Effect::Command(_) => None,
        })
    }
}

/// Advances the state machine by one sample.
///
/// The reached-check runs first on every sample regardless of phase. Phases
/// that fall through (search into alignment, alignment into approach) reuse
/// the same sample; anything that must observe the result of a turn waits
/// for the next one.
pub fn step(phase: Phase, sample: Option<Measurement>, tolerances: &Tolerances) -> Step {
    let mut pass = Pass::default();

    let next = match (phase, sample) {
        (_, Some(m)) if tolerances.is_reached(&m) => {
            pass.command(Command::Stop);
            pass.status(Status::TargetReached);
            Phase::Evaluate
        }
        (Phase::Evaluate | Phase::Searching, None) => {
            pass.command(Command::TurnRight);
            pass.status(Status::FindingTarget);
            Phase::Searching
        }
        (Phase::Aligning, None) => {
            // Lost mid-alignment, then the post-alignment guard sees the
            // same absence.
            pass.command(Command::Stop);
            pass.status(Status::TargetLost);
            pass.command(Command::Stop);
            pass.status(Status::TargetLost);
            Phase::Evaluate
        }
        (Phase::Evaluate, Some(m)) => pass.align(m, tolerances),
        (Phase::Searching, Some(m)) => {
            pass.command(Command::Stop);
            pass.status(Status::TargetFound);
            pass.align(m, tolerances)
        }
        (Phase::Aligning, Some(m)) if tolerances.is_aligned(&m) => {
            pass.command(Command::Stop);
            pass.status(Status::AlignedToTarget);
            pass.approach()
        }
        (Phase::Aligning, Some(m)) => pass.correct_heading(m),
    };

    Step {
        phase: next,
        effects: pass.effects,
    }
}

#[derive(Default)]
struct Pass {
    effects: Vec<Effect>,
}

impl Pass {
    fn command(&mut self, command: Command) {
        self.effects.push(Effect::Command(command));
    }

    fn status(&mut self, status: Status) {
        self.effects.push(Effect::Status(status));
    }

    // Entry into alignment with a present sample: already aligned skips
    // straight to the approach.
    fn align(&mut self, m: Measurement, tolerances: &Tolerances) -> Phase {
        if tolerances.is_aligned(&m) {
            self.approach()
        } else {
            self.correct_heading(m)
        }
    }

    fn correct_heading(&mut self, m: Measurement) -> Phase {
        self.status(Status::AligningToTarget);
        self.command(Command::toward(m.angle));
        Phase::Aligning
    }

    // One forward command per pass, then back to the top.
    fn approach(&mut self) -> Phase {
        self.command(Command::MoveForward);
        self.status(Status::MovingTowardsTarget);
        Phase::Evaluate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tolerances() -> Tolerances {
        Tolerances::new(400.0, 10.0)
    }

    fn m(distance: f64, angle: f64) -> Option<Measurement> {
        Some(Measurement::new(distance, angle))
    }

    #[rstest]
    #[case(Phase::Evaluate)]
    #[case(Phase::Searching)]
    #[case(Phase::Aligning)]
    fn reached_stops_from_any_phase(#[case] phase: Phase) {
        let out = step(phase, m(350.0, 40.0), &tolerances());
        assert_eq!(out.phase, Phase::Evaluate);
        assert_eq!(
            out.effects,
            vec![
                Effect::Command(Command::Stop),
                Effect::Status(Status::TargetReached)
            ]
        );
    }

    #[test]
    fn absent_sweeps_right() {
        let out = step(Phase::Evaluate, None, &tolerances());
        assert_eq!(out.phase, Phase::Searching);
        assert_eq!(out.commands().collect::<Vec<_>>(), vec![Command::TurnRight]);
        assert_eq!(out.statuses().collect::<Vec<_>>(), vec![Status::FindingTarget]);
    }

    #[test]
    fn found_while_searching_stops_then_aligns() {
        let out = step(Phase::Searching, m(1500.0, -45.0), &tolerances());
        assert_eq!(out.phase, Phase::Aligning);
        assert_eq!(
            out.effects,
            vec![
                Effect::Command(Command::Stop),
                Effect::Status(Status::TargetFound),
                Effect::Status(Status::AligningToTarget),
                Effect::Command(Command::TurnLeft),
            ]
        );
    }

    #[test]
    fn found_already_aligned_approaches() {
        let out = step(Phase::Searching, m(1500.0, 2.0), &tolerances());
        assert_eq!(out.phase, Phase::Evaluate);
        assert_eq!(
            out.commands().collect::<Vec<_>>(),
            vec![Command::Stop, Command::MoveForward]
        );
        assert_eq!(
            out.statuses().collect::<Vec<_>>(),
            vec![Status::TargetFound, Status::MovingTowardsTarget]
        );
    }

    #[test]
    fn visible_on_entry_skips_found_status() {
        let out = step(Phase::Evaluate, m(1500.0, 2.0), &tolerances());
        assert_eq!(
            out.effects,
            vec![
                Effect::Command(Command::MoveForward),
                Effect::Status(Status::MovingTowardsTarget),
            ]
        );
    }

    #[rstest]
    #[case(10.0)]
    #[case(-10.0)]
    #[case(0.0)]
    fn aligning_completes_on_closed_boundary(#[case] angle: f64) {
        let out = step(Phase::Aligning, m(1500.0, angle), &tolerances());
        assert_eq!(out.phase, Phase::Evaluate);
        assert_eq!(
            out.effects,
            vec![
                Effect::Command(Command::Stop),
                Effect::Status(Status::AlignedToTarget),
                Effect::Command(Command::MoveForward),
                Effect::Status(Status::MovingTowardsTarget),
            ]
        );
    }

    #[rstest]
    #[case(30.0, Command::TurnRight)]
    #[case(-30.0, Command::TurnLeft)]
    fn aligning_keeps_correcting(#[case] angle: f64, #[case] expected: Command) {
        let out = step(Phase::Aligning, m(1500.0, angle), &tolerances());
        assert_eq!(out.phase, Phase::Aligning);
        assert_eq!(
            out.effects,
            vec![
                Effect::Status(Status::AligningToTarget),
                Effect::Command(expected),
            ]
        );
    }

    #[test]
    fn lost_during_alignment_never_moves_forward() {
        let out = step(Phase::Aligning, None, &tolerances());
        assert_eq!(out.phase, Phase::Evaluate);
        assert!(out.commands().all(|c| c == Command::Stop));
        assert!(out.statuses().all(|s| s == Status::TargetLost));
        assert!(out.commands().count() >= 1);
    }

    #[test]
    fn zero_angle_never_turns_left() {
        let strict = Tolerances::new(400.0, 0.0);
        for phase in [Phase::Evaluate, Phase::Searching, Phase::Aligning] {
            let out = step(phase, m(1500.0, 0.0), &strict);
            assert!(out.commands().all(|c| c != Command::TurnLeft));
        }
    }

    #[test]
    fn smallest_positive_bearing_turns_right() {
        let strict = Tolerances::new(400.0, 0.0);
        let out = step(Phase::Evaluate, m(1500.0, f64::MIN_POSITIVE), &strict);
        assert_eq!(out.commands().collect::<Vec<_>>(), vec![Command::TurnRight]);
    }
}
