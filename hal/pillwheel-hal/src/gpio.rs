//! GPIO pin abstractions
//!
//! Output pins carry the stepper step/direction lines and the alert LED and
//! buzzer. The only input is the PIR motion sensor, which the runtime polls
//! through an [`EdgeDetector`].

/// Digital output pin
pub trait OutputPin {
    /// Drive the line high (logic 1)
    fn set_high(&mut self);

    /// Drive the line low (logic 0)
    fn set_low(&mut self);

    /// Drive the line to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the line is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the line reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the line reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Rising-edge detector for a polled input
///
/// A PIR sensor holds its output high for as long as it sees movement.
/// Callers want one event per detection, so only the low → high transition
/// is reported. An active-low sensor reports its high → low transition
/// instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeDetector {
    active_low: bool,
    last_active: bool,
}

impl EdgeDetector {
    /// Create a detector for an active-high sensor
    pub const fn new() -> Self {
        Self {
            active_low: false,
            last_active: false,
        }
    }

    /// Create a detector for an active-low sensor
    pub const fn active_low() -> Self {
        Self {
            active_low: true,
            last_active: false,
        }
    }

    /// Sample the pin; returns true exactly once per activation
    pub fn poll<P: InputPin>(&mut self, pin: &P) -> bool {
        self.update(pin.is_high())
    }

    /// Feed a raw level; returns true on the inactive → active transition
    pub fn update(&mut self, level_high: bool) -> bool {
        let active = level_high != self.active_low;
        let rising = active && !self.last_active;
        self.last_active = active;
        rising
    }

    /// Forget the previous level so the next active sample fires again
    pub fn reset(&mut self) {
        self.last_active = false;
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockInput {
        high: bool,
    }

    impl InputPin for MockInput {
        fn is_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_single_event_per_activation() {
        let mut detector = EdgeDetector::new();
        let mut pin = MockInput { high: false };

        assert!(!detector.poll(&pin));

        pin.high = true;
        assert!(detector.poll(&pin));
        // Held high: no repeat
        assert!(!detector.poll(&pin));
        assert!(!detector.poll(&pin));

        pin.high = false;
        assert!(!detector.poll(&pin));

        pin.high = true;
        assert!(detector.poll(&pin));
    }

    #[test]
    fn test_active_low_sensor() {
        let mut detector = EdgeDetector::active_low();

        assert!(!detector.update(true));
        assert!(detector.update(false));
        assert!(!detector.update(false));
        assert!(!detector.update(true));
    }

    #[test]
    fn test_reset_rearms() {
        let mut detector = EdgeDetector::new();
        assert!(detector.update(true));
        assert!(!detector.update(true));

        detector.reset();
        assert!(detector.update(true));
    }
}
