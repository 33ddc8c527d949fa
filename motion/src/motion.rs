use std::thread;
use std::time::{Duration, Instant};

use clock::Clock;

use crate::states::RunState;

/// Drive motor as exposed by the hardware layer: raw power plus an on-device
/// position-seeking mode that runs toward a target tick count on its own.
pub trait Motor {
    fn set_power(&mut self, power: f64);
    fn set_target_position_mode(&mut self, enabled: bool);
    fn set_target_position(&mut self, ticks: i64);
    fn current_position(&mut self) -> i64;
    fn is_busy(&mut self) -> bool;
}

/// How an encoder move ended. A timeout is a normal early exit, not an error.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum DriveOutcome {
    Reached,
    TimedOut,
    Cancelled,
}

/// Left/right drive pair plus the per-robot encoder calibration.
pub struct Drive<M> {
    left: M,
    right: M,
    ticks_per_inch: f64,
}

impl<M: Motor> Drive<M> {
    pub fn new(left: M, right: M, ticks_per_inch: f64) -> Drive<M> {
        Drive {
            left,
            right,
            ticks_per_inch,
        }
    }

    /// Relative move based on encoder counts. Encoders are not reset; the
    /// targets are computed from wherever the last move left the motors.
    /// The move stops as soon as the targets are reached, the timeout runs
    /// out, or the run is stopped from outside, and always leaves both
    /// motors at zero power in raw-power mode.
    pub fn encoder_drive<R, C>(
        &mut self,
        run: &R,
        clock: &mut C,
        speed: f64,
        left_inches: f64,
        right_inches: f64,
        timeout_s: f64,
    ) -> DriveOutcome
    where
        R: RunState,
        C: Clock,
    {
        if !run.is_active() {
            return DriveOutcome::Cancelled;
        }

        // Determine new target positions and hand them to the controllers.
        let left_target = self.left.current_position() + (left_inches * self.ticks_per_inch) as i64;
        let right_target =
            self.right.current_position() + (right_inches * self.ticks_per_inch) as i64;
        self.left.set_target_position(left_target);
        self.right.set_target_position(right_target);

        self.left.set_target_position_mode(true);
        self.right.set_target_position_mode(true);

        // Reset the timeout and start motion; only the magnitude of the
        // speed matters, the controllers run toward the targets themselves.
        clock.reset();
        self.left.set_power(speed.abs());
        self.right.set_power(speed.abs());

        log::info!(
            "Encoder move {:.1}in : {:.1}in at {:.2} -> targets {} : {}",
            left_inches,
            right_inches,
            speed.abs(),
            left_target,
            right_target
        );

        let mut last_report = Instant::now();
        let outcome = loop {
            if !run.is_active() {
                break DriveOutcome::Cancelled;
            }
            if clock.seconds() >= timeout_s {
                break DriveOutcome::TimedOut;
            }
            if !(self.left.is_busy() && self.right.is_busy()) {
                break DriveOutcome::Reached;
            }

            if last_report.elapsed() >= Duration::from_millis(100) {
                log::debug!(
                    "Running at {} : {}",
                    self.left.current_position(),
                    self.right.current_position()
                );
                last_report = Instant::now();
            }
            thread::yield_now();
        };

        // Stop all motion, then drop back to raw-power mode.
        self.left.set_power(0.0);
        self.right.set_power(0.0);
        self.left.set_target_position_mode(false);
        self.right.set_target_position_mode(false);

        if outcome == DriveOutcome::TimedOut {
            log::warn!("Encoder move timed out after {:.1}s", timeout_s);
        }
        outcome
    }

    /// Raw power to both sides, bypassing position control.
    pub fn set_power(&mut self, left: f64, right: f64) {
        self.left.set_power(left);
        self.right.set_power(right);
    }

    /// Zero both sides.
    pub fn stop(&mut self) {
        self.left.set_power(0.0);
        self.right.set_power(0.0);
    }

    pub fn left(&self) -> &M {
        &self.left
    }

    pub fn right(&self) -> &M {
        &self.right
    }
}

#[cfg(test)]
mod tests {
    use super::{Drive, DriveOutcome};
    use crate::sim::{CountdownRun, SimMotor};
    use crate::states::SharedRunState;
    use clock::StepClock;

    const TICKS_PER_INCH: f64 = 100.0;

    fn active_run() -> SharedRunState {
        let run = SharedRunState::new();
        run.start();
        run
    }

    fn drive() -> Drive<SimMotor> {
        Drive::new(SimMotor::new(50), SimMotor::new(50), TICKS_PER_INCH)
    }

    #[test]
    fn forward_move_reaches_target_and_idles_motors() {
        let mut drive = drive();
        let run = active_run();
        let mut clock = StepClock::new(0.001);

        let outcome = drive.encoder_drive(&run, &mut clock, 0.6, 2.0, 2.0, 5.0);

        assert_eq!(outcome, DriveOutcome::Reached);
        assert_eq!(drive.left().position(), 200);
        assert_eq!(drive.left().power(), 0.0);
        assert_eq!(drive.right().power(), 0.0);
        assert!(!drive.left().is_seeking());
        assert!(!drive.right().is_seeking());
    }

    #[test]
    fn reverse_move_runs_backwards() {
        let mut drive = drive();
        let run = active_run();
        let mut clock = StepClock::new(0.001);

        drive.encoder_drive(&run, &mut clock, 0.6, 1.0, 1.0, 5.0);
        assert_eq!(drive.left().position(), 100);

        let outcome = drive.encoder_drive(&run, &mut clock, -0.6, -1.0, -1.0, 5.0);
        assert_eq!(outcome, DriveOutcome::Reached);
        assert_eq!(drive.left().position(), 0);
        assert_eq!(drive.left().power(), 0.0);
        assert!(!drive.left().is_seeking());
    }

    #[test]
    fn targets_are_relative_to_current_position() {
        let mut drive = drive();
        let run = active_run();
        let mut clock = StepClock::new(0.001);

        drive.encoder_drive(&run, &mut clock, 0.6, 2.0, 2.0, 5.0);
        let first_target = drive.left().target();

        drive.encoder_drive(&run, &mut clock, 0.6, 2.0, 2.0, 5.0);
        assert_eq!(
            drive.left().target(),
            first_target + (2.0 * TICKS_PER_INCH) as i64
        );
    }

    #[test]
    fn zero_timeout_returns_after_at_most_one_poll() {
        let mut drive = drive();
        let run = active_run();
        let mut clock = StepClock::new(0.001);

        let outcome = drive.encoder_drive(&run, &mut clock, 0.6, 10.0, 10.0, 0.0);

        assert_eq!(outcome, DriveOutcome::TimedOut);
        assert!(drive.left().busy_polls() <= 1);
        assert_eq!(drive.left().power(), 0.0);
        assert!(!drive.left().is_seeking());
    }

    #[test]
    fn zero_distance_move_completes_immediately() {
        let mut drive = drive();
        let run = active_run();
        let mut clock = StepClock::new(0.001);

        let outcome = drive.encoder_drive(&run, &mut clock, 0.6, 0.0, 0.0, 5.0);
        assert_eq!(outcome, DriveOutcome::Reached);
        assert_eq!(drive.left().position(), 0);
    }

    #[test]
    fn stalled_move_times_out() {
        // slew 0: the motor never makes progress
        let mut drive = Drive::new(SimMotor::new(0), SimMotor::new(0), TICKS_PER_INCH);
        let run = active_run();
        let mut clock = StepClock::new(0.1);

        let outcome = drive.encoder_drive(&run, &mut clock, 0.6, 5.0, 5.0, 1.0);

        assert_eq!(outcome, DriveOutcome::TimedOut);
        assert!(drive.left().busy_polls() > 0);
        assert_eq!(drive.left().power(), 0.0);
        assert!(!drive.left().is_seeking());
    }

    #[test]
    fn external_stop_unwinds_within_one_poll() {
        let mut drive = drive();
        // active at entry plus two loop passes, then stopped
        let run = CountdownRun::new(3);
        let mut clock = StepClock::new(0.001);

        let outcome = drive.encoder_drive(&run, &mut clock, 0.6, 10.0, 10.0, 5.0);

        assert_eq!(outcome, DriveOutcome::Cancelled);
        assert!(drive.left().position() < drive.left().target());
        assert_eq!(drive.left().power(), 0.0);
        assert_eq!(drive.right().power(), 0.0);
        assert!(!drive.left().is_seeking());
    }

    #[test]
    fn inactive_run_skips_the_move() {
        let mut drive = drive();
        let run = CountdownRun::new(0);
        let mut clock = StepClock::new(0.001);

        let outcome = drive.encoder_drive(&run, &mut clock, 0.6, 10.0, 10.0, 5.0);

        assert_eq!(outcome, DriveOutcome::Cancelled);
        assert_eq!(drive.left().target(), 0);
        assert_eq!(drive.left().busy_polls(), 0);
    }
}
