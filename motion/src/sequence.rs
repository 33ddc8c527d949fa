use std::thread;
use std::time::{Duration, Instant};

use buttons::TouchSensor;
use clock::Clock;
use sensors::{ColorSensor, LightSensor};

use crate::motion::{Drive, DriveOutcome, Motor};
use crate::states::{LineAction, RunState, Step};

// Leg geometry of the fixed route, in inches of wheel travel per side.
const NUDGE_IN: f64 = 1.0;
const PIVOT_IN: f64 = 6.0;
const NUDGE_TIMEOUT_S: f64 = 1.0;
const LEG_TIMEOUT_S: f64 = 5.0;
// The bump-detect leg runs flat out.
const BUMP_POWER: f64 = 1.0;

/// Speeds and thresholds for one run; loaded from config by the host.
#[derive(Debug, Clone)]
pub struct Params {
    pub drive_speed: f64,
    pub turn_speed: f64,
    pub arm_speed: f64,
    pub approach_speed: f64,
    pub white_threshold: f64,
    pub settle_seconds: f64,
}

impl Default for Params {
    fn default() -> Params {
        Params {
            drive_speed: 0.6,
            turn_speed: 0.5,
            arm_speed: 0.1,
            approach_speed: 0.5,
            white_threshold: 0.2,
            settle_seconds: 1.0,
        }
    }
}

/// The fixed autonomous route: composes encoder moves with the sensor-gated
/// polling loops and reports the executed steps.
pub struct Sequence<M, L, C, T> {
    drive: Drive<M>,
    arm: M,
    light: L,
    color: C,
    front_touch: T,
    arm_touch: T,
    params: Params,
}

impl<M, L, C, T> Sequence<M, L, C, T>
where
    M: Motor,
    L: LightSensor,
    C: ColorSensor,
    T: TouchSensor,
{
    pub fn new(
        drive: Drive<M>,
        arm: M,
        light: L,
        color: C,
        front_touch: T,
        arm_touch: T,
        params: Params,
    ) -> Sequence<M, L, C, T> {
        Sequence {
            drive,
            arm,
            light,
            color,
            front_touch,
            arm_touch,
            params,
        }
    }

    /// Run the route to completion or external stop. Every stage leaves the
    /// motors at zero power when the run goes inactive, and no later stage
    /// starts once it has.
    pub fn run<R, K>(&mut self, run: &R, clock: &mut K) -> Vec<Step>
    where
        R: RunState,
        K: Clock,
    {
        let mut trace = Vec::new();

        run.wait_for_start();
        if !run.is_active() {
            log::warn!("Run stopped before start");
            return trace;
        }

        log::info!("Autonomous route started");
        self.color.enable_led(true);

        // Short shakedown move, then pivot toward the wall.
        self.leg(
            run,
            clock,
            &mut trace,
            self.params.drive_speed,
            NUDGE_IN,
            NUDGE_IN,
            NUDGE_TIMEOUT_S,
        );
        self.leg(
            run,
            clock,
            &mut trace,
            self.params.turn_speed,
            PIVOT_IN,
            -PIVOT_IN,
            LEG_TIMEOUT_S,
        );

        // Flat out until the front bumper hits.
        if self.drive_until_bump(run) {
            trace.push(Step::BumpStop);
        }

        // Back off and square up again.
        self.leg(
            run,
            clock,
            &mut trace,
            self.params.drive_speed,
            -NUDGE_IN,
            -NUDGE_IN,
            LEG_TIMEOUT_S,
        );
        self.leg(
            run,
            clock,
            &mut trace,
            self.params.turn_speed,
            -PIVOT_IN,
            PIVOT_IN,
            LEG_TIMEOUT_S,
        );

        // First line: creep to the white tape, then service the beacon.
        if self.drive_until_line(run) {
            trace.push(Step::LineStop);
            self.service_line(run, clock, &mut trace);
        }

        // Second line further along the field.
        self.leg(
            run,
            clock,
            &mut trace,
            self.params.drive_speed,
            NUDGE_IN,
            NUDGE_IN,
            NUDGE_TIMEOUT_S,
        );
        if self.drive_until_line(run) {
            trace.push(Step::LineStop);
            self.service_line(run, clock, &mut trace);
        }

        // Pause for the actuators to finish moving.
        if self.settle(run, clock) {
            trace.push(Step::Settle);
        }

        if run.is_active() {
            trace.push(Step::Complete);
            log::info!("Route complete");
        } else {
            log::warn!("Route stopped early");
        }
        trace
    }

    fn leg<R, K>(
        &mut self,
        run: &R,
        clock: &mut K,
        trace: &mut Vec<Step>,
        speed: f64,
        left_in: f64,
        right_in: f64,
        timeout_s: f64,
    ) where
        R: RunState,
        K: Clock,
    {
        let outcome = self
            .drive
            .encoder_drive(run, clock, speed, left_in, right_in, timeout_s);
        if outcome != DriveOutcome::Cancelled {
            trace.push(Step::Move);
        }
    }

    /// Full power into the wall until the front switch closes.
    fn drive_until_bump<R: RunState>(&mut self, run: &R) -> bool {
        self.drive.set_power(BUMP_POWER, BUMP_POWER);
        let mut hit = false;
        loop {
            if !run.is_active() {
                break;
            }
            if self.front_touch.is_pressed() {
                hit = true;
                break;
            }
            thread::yield_now();
        }
        self.drive.stop();
        if hit {
            log::info!("Front bumper contact, drive stopped");
        }
        hit
    }

    /// Creep forward until the floor reading crosses the white threshold.
    fn drive_until_line<R: RunState>(&mut self, run: &R) -> bool {
        self.drive
            .set_power(self.params.approach_speed, self.params.approach_speed);
        let mut found = false;
        let mut last_report = Instant::now();
        loop {
            if !run.is_active() {
                break;
            }
            let level = self.light.light_detected();
            if level >= self.params.white_threshold {
                found = true;
                break;
            }
            if last_report.elapsed() >= Duration::from_millis(100) {
                log::debug!("Light level {:.3}", level);
                last_report = Instant::now();
            }
            thread::yield_now();
        }
        self.drive.stop();
        if found {
            log::info!("White line found, drive stopped");
        }
        found
    }

    /// One beacon service: read the color once, then either lower the arm in
    /// place (blue-dominant) or nudge forward first. The in-place branch
    /// watches the front switch, the nudge branch watches the arm switch.
    fn service_line<R, K>(&mut self, run: &R, clock: &mut K, trace: &mut Vec<Step>)
    where
        R: RunState,
        K: Clock,
    {
        let red = self.color.red();
        let blue = self.color.blue();
        let action = LineAction::from_channels(red, blue);
        log::info!("Color read r={} b={} -> {:?}", red, blue, action);

        match action {
            LineAction::DirectArm => {
                if lower_until_pressed(run, &mut self.arm, &mut self.front_touch, self.params.arm_speed)
                {
                    trace.push(Step::ArmContact);
                }
            }
            LineAction::ApproachThenArm => {
                let outcome = self.drive.encoder_drive(
                    run,
                    clock,
                    self.params.approach_speed,
                    NUDGE_IN,
                    NUDGE_IN,
                    NUDGE_TIMEOUT_S,
                );
                if outcome != DriveOutcome::Cancelled {
                    trace.push(Step::Approach);
                }
                if lower_until_pressed(run, &mut self.arm, &mut self.arm_touch, self.params.arm_speed)
                {
                    trace.push(Step::ArmContact);
                }
            }
        }
    }

    /// Clock-bounded pause, still cancellable from outside.
    fn settle<R, K>(&mut self, run: &R, clock: &mut K) -> bool
    where
        R: RunState,
        K: Clock,
    {
        clock.reset();
        loop {
            if !run.is_active() {
                return false;
            }
            if clock.seconds() >= self.params.settle_seconds {
                return true;
            }
            thread::yield_now();
        }
    }

    pub fn drive(&self) -> &Drive<M> {
        &self.drive
    }

    pub fn arm(&self) -> &M {
        &self.arm
    }

    pub fn color(&self) -> &C {
        &self.color
    }
}

/// Lower the arm until the given switch closes; power is re-asserted every
/// poll and zeroed on exit.
fn lower_until_pressed<R, M, T>(run: &R, arm: &mut M, touch: &mut T, speed: f64) -> bool
where
    R: RunState,
    M: Motor,
    T: TouchSensor,
{
    let mut contact = false;
    loop {
        if !run.is_active() {
            break;
        }
        if touch.is_pressed() {
            contact = true;
            break;
        }
        arm.set_power(-speed);
        thread::yield_now();
    }
    arm.set_power(0.0);
    if contact {
        log::info!("Arm contact, actuator stopped");
    }
    contact
}
