pub mod sensors {
    /// Reflected-light sensor, normalized to 0.0 (dark) ..= 1.0 (bright).
    pub trait LightSensor {
        fn light_detected(&mut self) -> f64;
    }

    /// RGB color sensor; only the red and blue channels matter here.
    pub trait ColorSensor {
        fn red(&mut self) -> i32;
        fn blue(&mut self) -> i32;
        fn enable_led(&mut self, on: bool);
    }
}

pub mod sim {
    use crate::sensors::{ColorSensor, LightSensor};
    use std::collections::VecDeque;

    /// Scripted light sensor: pops one reading per poll and holds the last
    /// one once the script runs out.
    pub struct SimLightSensor {
        readings: VecDeque<f64>,
        last: f64,
    }

    impl SimLightSensor {
        pub fn new(level: f64) -> SimLightSensor {
            SimLightSensor {
                readings: VecDeque::new(),
                last: level,
            }
        }

        pub fn with_readings(readings: &[f64]) -> SimLightSensor {
            SimLightSensor {
                readings: readings.iter().copied().collect(),
                last: 0.0,
            }
        }

        /// Scripted readings not yet consumed.
        pub fn remaining(&self) -> usize {
            self.readings.len()
        }
    }

    impl LightSensor for SimLightSensor {
        fn light_detected(&mut self) -> f64 {
            if let Some(level) = self.readings.pop_front() {
                self.last = level;
            }
            self.last
        }
    }

    /// Scripted color sensor. Each red-channel read advances to the next
    /// scripted sample; the blue channel reads from the same sample.
    pub struct SimColorSensor {
        samples: VecDeque<(i32, i32)>,
        current: (i32, i32),
        led_on: bool,
    }

    impl SimColorSensor {
        pub fn new(red: i32, blue: i32) -> SimColorSensor {
            SimColorSensor {
                samples: VecDeque::new(),
                current: (red, blue),
                led_on: false,
            }
        }

        pub fn with_samples(samples: &[(i32, i32)]) -> SimColorSensor {
            SimColorSensor {
                samples: samples.iter().copied().collect(),
                current: (0, 0),
                led_on: false,
            }
        }

        pub fn led_on(&self) -> bool {
            self.led_on
        }
    }

    impl ColorSensor for SimColorSensor {
        fn red(&mut self) -> i32 {
            if let Some(sample) = self.samples.pop_front() {
                self.current = sample;
            }
            self.current.0
        }

        fn blue(&mut self) -> i32 {
            self.current.1
        }

        fn enable_led(&mut self, on: bool) {
            log::debug!("color sensor LED {}", if on { "on" } else { "off" });
            self.led_on = on;
        }
    }
}

pub use sensors::{ColorSensor, LightSensor};

#[cfg(test)]
mod tests {
    use super::sim::{SimColorSensor, SimLightSensor};
    use super::{ColorSensor, LightSensor};

    #[test]
    fn light_script_holds_last_reading() {
        let mut light = SimLightSensor::with_readings(&[0.1, 0.3]);
        assert_eq!(light.light_detected(), 0.1);
        assert_eq!(light.light_detected(), 0.3);
        assert_eq!(light.light_detected(), 0.3);
        assert_eq!(light.remaining(), 0);
    }

    #[test]
    fn color_advances_on_red_read() {
        let mut color = SimColorSensor::with_samples(&[(2, 9), (9, 2)]);
        assert_eq!(color.red(), 2);
        assert_eq!(color.blue(), 9);
        assert_eq!(color.red(), 9);
        assert_eq!(color.blue(), 2);
        // script exhausted, last sample sticks
        assert_eq!(color.red(), 9);
    }

    #[test]
    fn led_state_tracked() {
        let mut color = SimColorSensor::new(0, 0);
        assert!(!color.led_on());
        color.enable_led(true);
        assert!(color.led_on());
    }
}
