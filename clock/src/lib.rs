pub mod clock {
    use std::time::Instant;

    /// Monotonic elapsed-time source used to bound motion commands.
    pub trait Clock {
        /// Restart the stopwatch at zero.
        fn reset(&mut self);
        /// Seconds elapsed since the last reset.
        fn seconds(&mut self) -> f64;
    }

    /// Stopwatch over the operating-system monotonic clock.
    pub struct SystemClock {
        started: Instant,
    }

    impl SystemClock {
        pub fn new() -> SystemClock {
            SystemClock {
                started: Instant::now(),
            }
        }
    }

    impl Clock for SystemClock {
        fn reset(&mut self) {
            self.started = Instant::now();
        }

        fn seconds(&mut self) -> f64 {
            self.started.elapsed().as_secs_f64()
        }
    }

    /// Bench clock that advances a fixed step on every read, so loop timing
    /// stays deterministic when no hardware is attached.
    pub struct StepClock {
        now: f64,
        step: f64,
    }

    impl StepClock {
        pub fn new(step: f64) -> StepClock {
            StepClock { now: 0.0, step }
        }
    }

    impl Clock for StepClock {
        fn reset(&mut self) {
            self.now = 0.0;
        }

        fn seconds(&mut self) -> f64 {
            let t = self.now;
            self.now += self.step;
            t
        }
    }
}

pub use clock::{Clock, StepClock, SystemClock};
