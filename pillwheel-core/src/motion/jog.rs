//! Jog state
//!
//! Manual single-step motion for maintenance. A jog unit moves the tracked
//! position by exactly one slot with no step-table lookup.

use super::position::Slot;
use crate::traits::Direction;

/// Jog controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JogState {
    #[default]
    Idle,
    Jogging(Direction),
}

impl JogState {
    /// Begin (or re-aim) jogging
    pub fn start(&mut self, direction: Direction) {
        *self = JogState::Jogging(direction);
    }

    /// Release the jog. Returns true if a jog was running.
    pub fn stop(&mut self) -> bool {
        let was_jogging = self.is_jogging();
        *self = JogState::Idle;
        was_jogging
    }

    pub fn is_jogging(&self) -> bool {
        matches!(self, JogState::Jogging(_))
    }

    /// Direction of the running jog
    pub fn direction(&self) -> Option<Direction> {
        match self {
            JogState::Idle => None,
            JogState::Jogging(direction) => Some(*direction),
        }
    }
}

/// Position after one completed jog unit
pub fn jog_unit(from: Slot, direction: Direction) -> Slot {
    from.step(direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_idempotent() {
        let mut jog = JogState::default();
        assert!(!jog.stop());

        jog.start(Direction::Reverse);
        assert_eq!(jog.direction(), Some(Direction::Reverse));
        assert!(jog.stop());
        assert!(!jog.stop());
        assert_eq!(jog, JogState::Idle);
    }

    #[test]
    fn test_jog_unit_wraps() {
        let last = Slot::new(13).unwrap();
        assert_eq!(jog_unit(last, Direction::Forward), Slot::HOME);
        assert_eq!(jog_unit(Slot::HOME, Direction::Reverse), last);
    }
}
