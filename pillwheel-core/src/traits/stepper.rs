//! Stepper pulse output trait
//!
//! The carousel motor is driven by a step/direction driver (A4988 class):
//! one line selects direction, each rising edge on the other advances one
//! full step.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Carousel rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Increasing slot order; the only direction used for planned rotation
    #[default]
    Forward,
    /// Decreasing slot order; jog only
    Reverse,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Level of the direction line (true = forward)
    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }
}

/// Step/direction output lines
///
/// Calls must be near-instantaneous. Settling time between edges belongs
/// to the motor executor's timing, never to the implementation.
pub trait PulseOutput {
    /// Set the direction line
    ///
    /// Only called between pulses, never while the step line is high.
    fn set_direction(&mut self, direction: Direction);

    /// Drive the step line
    fn set_step(&mut self, high: bool);
}

impl<T: PulseOutput + ?Sized> PulseOutput for &mut T {
    fn set_direction(&mut self, direction: Direction) {
        (**self).set_direction(direction);
    }

    fn set_step(&mut self, high: bool) {
        (**self).set_step(high);
    }
}
