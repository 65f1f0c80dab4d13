//! Step/direction stepper output
//!
//! A4988/DRV8825 class drivers take one direction line and one step line;
//! each rising edge on STEP advances one full step in the DIR direction.

use pillwheel_core::traits::{Direction, PulseOutput};
use pillwheel_hal::OutputPin;

/// GPIO step/direction output
pub struct StepDirOutput<S, D> {
    step: S,
    dir: D,
    /// If true, forward = DIR low
    dir_inverted: bool,
}

impl<S: OutputPin, D: OutputPin> StepDirOutput<S, D> {
    /// Create the output with STEP low and DIR set to forward
    ///
    /// # Arguments
    /// - `step`: STEP line
    /// - `dir`: DIR line
    /// - `dir_inverted`: If true, forward rotation drives DIR low (motor wired reversed)
    pub fn new(step: S, dir: D, dir_inverted: bool) -> Self {
        let mut output = Self {
            step,
            dir,
            dir_inverted,
        };
        output.step.set_low();
        output.set_direction(Direction::Forward);
        output
    }

    /// Release the pins
    pub fn into_inner(self) -> (S, D) {
        (self.step, self.dir)
    }
}

impl<S: OutputPin, D: OutputPin> PulseOutput for StepDirOutput<S, D> {
    fn set_direction(&mut self, direction: Direction) {
        self.dir.set_state(direction.is_forward() != self.dir_inverted);
    }

    fn set_step(&mut self, high: bool) {
        self.step.set_state(high);
    }
}
