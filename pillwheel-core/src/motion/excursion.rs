//! Maintenance excursion
//!
//! Entering maintenance remembers where the carousel was. Leaving asks for
//! a rotation back there if jogging or manual slot picks moved it. An alarm
//! stop never restores; only this path does.

use super::position::Slot;

/// Open-or-closed maintenance excursion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Excursion {
    origin: Option<Slot>,
}

impl Excursion {
    pub const fn new() -> Self {
        Self { origin: None }
    }

    /// Record `current` as the return point
    ///
    /// Re-entering while already open keeps the first return point.
    /// Returns true if this call opened the excursion.
    pub fn begin(&mut self, current: Slot) -> bool {
        if self.origin.is_some() {
            return false;
        }
        self.origin = Some(current);
        true
    }

    /// Close the excursion
    ///
    /// Returns the slot to rotate back to, or `None` when already there or
    /// when no excursion was open.
    pub fn end(&mut self, current: Slot) -> Option<Slot> {
        self.origin.take().filter(|&origin| origin != current)
    }

    pub fn is_open(&self) -> bool {
        self.origin.is_some()
    }

    /// Recorded return point
    pub fn origin(&self) -> Option<Slot> {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(index: u8) -> Slot {
        Slot::new(index).unwrap()
    }

    #[test]
    fn test_restore_after_move() {
        let mut excursion = Excursion::new();
        assert!(excursion.begin(slot(3)));
        assert_eq!(excursion.end(slot(5)), Some(slot(3)));
        assert!(!excursion.is_open());
    }

    #[test]
    fn test_no_restore_when_unmoved() {
        let mut excursion = Excursion::new();
        excursion.begin(slot(3));
        assert_eq!(excursion.end(slot(3)), None);
    }

    #[test]
    fn test_begin_keeps_first_origin() {
        let mut excursion = Excursion::new();
        assert!(excursion.begin(slot(3)));
        assert!(!excursion.begin(slot(8)));
        assert_eq!(excursion.origin(), Some(slot(3)));
    }

    #[test]
    fn test_end_without_begin() {
        let mut excursion = Excursion::new();
        assert_eq!(excursion.end(slot(2)), None);
    }
}
