// This module contains the run-lifecycle and branch types for the sequencer.
// To add or modify states, edit this file only.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

/// Lifecycle of one autonomous run.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum RunPhase {
    NotStarted,
    Active,
    Stopped,
}

/// Externally controlled liveness gate; every polling loop re-checks it each
/// iteration and unwinds as soon as it reports inactive.
pub trait RunState {
    /// False before start and after stop/cancel.
    fn is_active(&self) -> bool;
    /// Suspend the caller until the run begins (or is stopped outright).
    fn wait_for_start(&self);
}

const PHASE_NOT_STARTED: u8 = 0;
const PHASE_ACTIVE: u8 = 1;
const PHASE_STOPPED: u8 = 2;

/// Clonable run flag toggled from outside the control loop.
#[derive(Clone)]
pub struct SharedRunState {
    phase: Arc<AtomicU8>,
}

impl SharedRunState {
    pub fn new() -> SharedRunState {
        SharedRunState {
            phase: Arc::new(AtomicU8::new(PHASE_NOT_STARTED)),
        }
    }

    pub fn start(&self) {
        self.phase.store(PHASE_ACTIVE, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.phase.store(PHASE_STOPPED, Ordering::SeqCst);
    }

    pub fn phase(&self) -> RunPhase {
        match self.phase.load(Ordering::SeqCst) {
            PHASE_ACTIVE => RunPhase::Active,
            PHASE_STOPPED => RunPhase::Stopped,
            _ => RunPhase::NotStarted,
        }
    }
}

impl RunState for SharedRunState {
    fn is_active(&self) -> bool {
        self.phase.load(Ordering::SeqCst) == PHASE_ACTIVE
    }

    fn wait_for_start(&self) {
        while self.phase.load(Ordering::SeqCst) == PHASE_NOT_STARTED {
            thread::yield_now();
        }
    }
}

/// What to do at a line stop, decided once from the color channels.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum LineAction {
    /// Blue-dominant reading: lower the arm in place.
    DirectArm,
    /// Anything else: one short forward move first.
    ApproachThenArm,
}

impl LineAction {
    pub fn from_channels(red: i32, blue: i32) -> LineAction {
        if blue > red {
            LineAction::DirectArm
        } else {
            LineAction::ApproachThenArm
        }
    }
}

/// One executed stage of the route, in order.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Step {
    Move,
    BumpStop,
    LineStop,
    Approach,
    ArmContact,
    Settle,
    Complete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flag_walks_through_phases() {
        let run = SharedRunState::new();
        assert_eq!(run.phase(), RunPhase::NotStarted);
        assert!(!run.is_active());

        run.start();
        assert_eq!(run.phase(), RunPhase::Active);
        assert!(run.is_active());

        run.stop();
        assert_eq!(run.phase(), RunPhase::Stopped);
        assert!(!run.is_active());
    }

    #[test]
    fn stop_is_visible_through_clones() {
        let run = SharedRunState::new();
        let observer = run.clone();
        run.start();
        assert!(observer.is_active());
        observer.stop();
        assert!(!run.is_active());
    }

    #[test]
    fn line_action_decision_table() {
        assert_eq!(LineAction::from_channels(3, 9), LineAction::DirectArm);
        assert_eq!(LineAction::from_channels(9, 3), LineAction::ApproachThenArm);
        // ties fall through to the approach branch
        assert_eq!(LineAction::from_channels(5, 5), LineAction::ApproachThenArm);
    }
}
