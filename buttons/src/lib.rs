pub mod buttons {
    use embedded_hal::digital::InputPin;

    /// Momentary touch/bump switch.
    pub trait TouchSensor {
        fn is_pressed(&mut self) -> bool;
    }

    /// Touch sensor backed by any digital input pin.
    ///
    /// `active_low` suits a switch that closes the pin to ground through a
    /// pull-up; `active_high` covers the opposite wiring.
    pub struct SwitchPin<P> {
        pin: P,
        pressed_level_high: bool,
    }

    impl<P: InputPin> SwitchPin<P> {
        pub fn active_low(pin: P) -> SwitchPin<P> {
            SwitchPin {
                pin,
                pressed_level_high: false,
            }
        }

        pub fn active_high(pin: P) -> SwitchPin<P> {
            SwitchPin {
                pin,
                pressed_level_high: true,
            }
        }

        pub fn into_inner(self) -> P {
            self.pin
        }
    }

    impl<P: InputPin> TouchSensor for SwitchPin<P> {
        fn is_pressed(&mut self) -> bool {
            let high = self.pin.is_high().unwrap_or_default();
            high == self.pressed_level_high
        }
    }

    /// Previous/current sample pair for a button.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct PressEdge {
        previous: bool,
        current: bool,
    }

    impl PressEdge {
        pub fn new() -> PressEdge {
            PressEdge {
                previous: false,
                current: false,
            }
        }

        /// Record one sample; true exactly on an up -> down transition.
        pub fn update(&mut self, pressed: bool) -> bool {
            self.previous = self.current;
            self.current = pressed;
            self.current && !self.previous
        }

        pub fn is_pressed(&self) -> bool {
            self.current
        }
    }
}

pub mod sim {
    use crate::buttons::TouchSensor;
    use std::collections::VecDeque;

    /// Scripted touch sensor: pops one state per poll and holds the last
    /// one once the script runs out.
    pub struct SimTouchSensor {
        script: VecDeque<bool>,
        last: bool,
    }

    impl SimTouchSensor {
        pub fn new(pressed: bool) -> SimTouchSensor {
            SimTouchSensor {
                script: VecDeque::new(),
                last: pressed,
            }
        }

        /// Unpressed for `polls` reads, then pressed.
        pub fn pressed_after(polls: usize) -> SimTouchSensor {
            let mut script: VecDeque<bool> = std::iter::repeat(false).take(polls).collect();
            script.push_back(true);
            SimTouchSensor {
                script,
                last: false,
            }
        }

        pub fn with_script(script: &[bool]) -> SimTouchSensor {
            SimTouchSensor {
                script: script.iter().copied().collect(),
                last: false,
            }
        }
    }

    impl TouchSensor for SimTouchSensor {
        fn is_pressed(&mut self) -> bool {
            if let Some(state) = self.script.pop_front() {
                self.last = state;
            }
            self.last
        }
    }
}

pub use buttons::{PressEdge, SwitchPin, TouchSensor};
