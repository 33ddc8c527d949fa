// Host-side stand-ins for the drive hardware. Everything here advances
// deterministically so the control loops can run on the bench.

use std::cell::Cell;

use crate::motion::Motor;
use crate::states::RunState;

/// Simulated drive motor with an on-device position-seeking mode.
///
/// Each busy poll advances the position toward the target in proportion to
/// the commanded power (`slew` ticks per poll at full power), standing in
/// for the work the real motor controller does between polls.
pub struct SimMotor {
    position: i64,
    target: i64,
    power: f64,
    seeking: bool,
    slew: i64,
    busy_polls: u32,
}

impl SimMotor {
    pub fn new(slew: i64) -> SimMotor {
        SimMotor {
            position: 0,
            target: 0,
            power: 0.0,
            seeking: false,
            slew,
            busy_polls: 0,
        }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    /// Busy polls observed while position-seeking.
    pub fn busy_polls(&self) -> u32 {
        self.busy_polls
    }
}

impl Motor for SimMotor {
    fn set_power(&mut self, power: f64) {
        self.power = power;
    }

    fn set_target_position_mode(&mut self, enabled: bool) {
        self.seeking = enabled;
    }

    fn set_target_position(&mut self, ticks: i64) {
        self.target = ticks;
    }

    fn current_position(&mut self) -> i64 {
        self.position
    }

    fn is_busy(&mut self) -> bool {
        if !self.seeking || self.position == self.target {
            return false;
        }
        self.busy_polls += 1;
        let step = (self.power.abs() * self.slew as f64) as i64;
        if step > 0 {
            let remaining = self.target - self.position;
            self.position += remaining.clamp(-step, step);
        }
        self.position != self.target
    }
}

/// Run flag that reports active for a fixed number of checks, then stops.
/// Stands in for a driver-station stop arriving mid-loop.
pub struct CountdownRun {
    checks_left: Cell<u32>,
}

impl CountdownRun {
    pub fn new(checks: u32) -> CountdownRun {
        CountdownRun {
            checks_left: Cell::new(checks),
        }
    }
}

impl RunState for CountdownRun {
    fn is_active(&self) -> bool {
        let left = self.checks_left.get();
        if left == 0 {
            return false;
        }
        self.checks_left.set(left - 1);
        true
    }

    fn wait_for_start(&self) {}
}

#[cfg(test)]
mod tests {
    use super::{CountdownRun, SimMotor};
    use crate::motion::Motor;
    use crate::states::RunState;

    #[test]
    fn seeking_motor_slews_toward_target() {
        let mut motor = SimMotor::new(50);
        motor.set_target_position(120);
        motor.set_target_position_mode(true);
        motor.set_power(1.0);

        assert!(motor.is_busy());
        assert_eq!(motor.position(), 50);
        assert!(motor.is_busy());
        assert_eq!(motor.position(), 100);
        // final step clamps onto the target and reports idle
        assert!(!motor.is_busy());
        assert_eq!(motor.position(), 120);
    }

    #[test]
    fn raw_mode_motor_is_never_busy() {
        let mut motor = SimMotor::new(50);
        motor.set_power(0.8);
        assert!(!motor.is_busy());
        assert_eq!(motor.busy_polls(), 0);
    }

    #[test]
    fn countdown_run_expires() {
        let run = CountdownRun::new(2);
        assert!(run.is_active());
        assert!(run.is_active());
        assert!(!run.is_active());
        assert!(!run.is_active());
    }
}
