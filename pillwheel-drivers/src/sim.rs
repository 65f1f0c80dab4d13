//! Simulation outputs
//!
//! Stand-ins for machines without the stepper driver or alert hardware.
//! They record what would have reached the pins so behavior stays
//! observable. Timing is unaffected: the motor executor still awaits its
//! delays against a simulated output.

use pillwheel_core::traits::{AlertOutput, Direction, PulseOutput};

/// Simulated step/direction output
#[derive(Debug, Clone, Default)]
pub struct SimPulseOutput {
    direction: Direction,
    step_high: bool,
    forward_pulses: u32,
    reverse_pulses: u32,
    direction_writes: u32,
}

impl SimPulseOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rising edges emitted in each direction
    pub fn pulses(&self) -> (u32, u32) {
        (self.forward_pulses, self.reverse_pulses)
    }

    /// Total rising edges
    pub fn total_pulses(&self) -> u32 {
        self.forward_pulses + self.reverse_pulses
    }

    /// Number of direction line writes
    pub fn direction_writes(&self) -> u32 {
        self.direction_writes
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True if nothing was ever written
    pub fn untouched(&self) -> bool {
        self.total_pulses() == 0 && self.direction_writes == 0 && !self.step_high
    }
}

impl PulseOutput for SimPulseOutput {
    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.direction_writes += 1;
    }

    fn set_step(&mut self, high: bool) {
        if high && !self.step_high {
            match self.direction {
                Direction::Forward => self.forward_pulses += 1,
                Direction::Reverse => self.reverse_pulses += 1,
            }
        }
        self.step_high = high;
    }
}

/// Simulated buzzer and LED
#[derive(Debug, Clone, Default)]
pub struct SimAlert {
    audio: bool,
    led: bool,
    audio_activations: u32,
    led_activations: u32,
}

impl SimAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn audio_on(&self) -> bool {
        self.audio
    }

    pub fn led_on(&self) -> bool {
        self.led
    }

    /// Off → on transitions of the audio line
    pub fn audio_activations(&self) -> u32 {
        self.audio_activations
    }

    /// Off → on transitions of the LED (flash toggles included)
    pub fn led_activations(&self) -> u32 {
        self.led_activations
    }
}

impl AlertOutput for SimAlert {
    fn set_audio(&mut self, on: bool) {
        if on && !self.audio {
            self.audio_activations += 1;
        }
        self.audio = on;
    }

    fn set_led(&mut self, on: bool) {
        if on && !self.led {
            self.led_activations += 1;
        }
        self.led = on;
    }
}
