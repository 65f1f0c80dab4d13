//! GPIO alert output
//!
//! Buzzer and LED each on their own line, directly or through a transistor.
//! Polarity is handled by the pins themselves (`"!gpioN"`).

use pillwheel_core::traits::AlertOutput;
use pillwheel_hal::OutputPin;

/// Buzzer + LED alert
pub struct GpioAlert<L, B> {
    led: L,
    buzzer: B,
}

impl<L: OutputPin, B: OutputPin> GpioAlert<L, B> {
    /// Create the alert with both lines off
    pub fn new(led: L, buzzer: B) -> Self {
        let mut alert = Self { led, buzzer };
        alert.set_alert(false);
        alert
    }

    pub fn led_on(&self) -> bool {
        self.led.is_set_high()
    }

    pub fn audio_on(&self) -> bool {
        self.buzzer.is_set_high()
    }
}

impl<L: OutputPin, B: OutputPin> AlertOutput for GpioAlert<L, B> {
    fn set_audio(&mut self, on: bool) {
        self.buzzer.set_state(on);
    }

    fn set_led(&mut self, on: bool) {
        self.led.set_state(on);
    }
}
