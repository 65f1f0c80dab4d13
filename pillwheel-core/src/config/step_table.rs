//! Per-slot step counts
//!
//! The wheel is not evenly divisible: 200 full steps over 14 compartments
//! leaves four slots one step longer than the rest. Each entry is the pulse
//! count that advances the carousel from that slot to the next.

use core::fmt;

use crate::motion::position::{Slot, SLOT_COUNT};

/// Full steps per carousel revolution on the reference hardware
pub const STEPS_PER_REVOLUTION: u32 = 200;

/// Step table measured on the reference hardware
pub const DEFAULT_STEP_TABLE: [u16; SLOT_COUNT] =
    [14, 14, 14, 15, 15, 14, 14, 14, 14, 14, 15, 15, 14, 14];

/// Reasons a step table is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepTableError {
    /// Table does not have one entry per slot
    WrongLength { len: usize },
    /// A slot would advance by zero steps
    ZeroEntry { slot: u8 },
    /// Entries do not add up to one revolution
    SumMismatch { expected: u32, actual: u32 },
}

impl fmt::Display for StepTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepTableError::WrongLength { len } => {
                write!(f, "expected {} entries, got {}", SLOT_COUNT, len)
            }
            StepTableError::ZeroEntry { slot } => write!(f, "slot {} has zero steps", slot),
            StepTableError::SumMismatch { expected, actual } => {
                write!(f, "entries sum to {}, expected {}", actual, expected)
            }
        }
    }
}

/// Validated step table
///
/// Construction is the only place the revolution invariant is checked, so a
/// `StepTable` in hand always sums to its `steps_per_revolution`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepTable {
    entries: [u16; SLOT_COUNT],
    steps_per_revolution: u32,
}

impl Default for StepTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_STEP_TABLE,
            steps_per_revolution: STEPS_PER_REVOLUTION,
        }
    }
}

impl StepTable {
    /// Validate a table against the configured revolution length
    pub fn new(
        entries: [u16; SLOT_COUNT],
        steps_per_revolution: u32,
    ) -> Result<Self, StepTableError> {
        if let Some(slot) = entries.iter().position(|&steps| steps == 0) {
            return Err(StepTableError::ZeroEntry { slot: slot as u8 });
        }

        let actual: u32 = entries.iter().map(|&steps| steps as u32).sum();
        if actual != steps_per_revolution {
            return Err(StepTableError::SumMismatch {
                expected: steps_per_revolution,
                actual,
            });
        }

        Ok(Self {
            entries,
            steps_per_revolution,
        })
    }

    /// Validate a table of unknown length (as parsed from configuration)
    pub fn from_slice(entries: &[u16], steps_per_revolution: u32) -> Result<Self, StepTableError> {
        let entries: [u16; SLOT_COUNT] = entries
            .try_into()
            .map_err(|_| StepTableError::WrongLength { len: entries.len() })?;
        Self::new(entries, steps_per_revolution)
    }

    /// Pulses needed to advance from `slot` to the next slot
    pub fn steps_for(&self, slot: Slot) -> u16 {
        self.entries[slot.index() as usize]
    }

    /// Raw entries in slot order
    pub fn entries(&self) -> &[u16; SLOT_COUNT] {
        &self.entries
    }

    /// Steps in one full revolution
    pub fn steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution
    }

    /// Forward-only walk from `from` to `to`
    ///
    /// Yields `(to - from) mod 14` consecutive `(slot, steps)` pairs starting
    /// at `from`. Equal slots yield nothing.
    pub fn steps_between(&self, from: Slot, to: Slot) -> impl Iterator<Item = (Slot, u16)> + '_ {
        (0..from.distance_to(to)).map(move |offset| {
            let slot = from.advance(offset);
            (slot, self.steps_for(slot))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(index: u8) -> Slot {
        Slot::new(index).unwrap()
    }

    #[test]
    fn test_default_table_is_one_revolution() {
        let table = StepTable::default();
        let sum: u32 = table.entries().iter().map(|&s| s as u32).sum();
        assert_eq!(sum, STEPS_PER_REVOLUTION);
        assert_eq!(StepTable::new(DEFAULT_STEP_TABLE, 200), Ok(table));
    }

    #[test]
    fn test_rejects_sum_mismatch() {
        let mut entries = DEFAULT_STEP_TABLE;
        entries[0] = 15;
        assert_eq!(
            StepTable::new(entries, 200),
            Err(StepTableError::SumMismatch {
                expected: 200,
                actual: 201
            })
        );
    }

    #[test]
    fn test_rejects_zero_entry() {
        let mut entries = DEFAULT_STEP_TABLE;
        entries[4] = 0;
        entries[5] = 29;
        assert_eq!(
            StepTable::new(entries, 200),
            Err(StepTableError::ZeroEntry { slot: 4 })
        );
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert_eq!(
            StepTable::from_slice(&[100, 100], 200),
            Err(StepTableError::WrongLength { len: 2 })
        );
        assert!(StepTable::from_slice(&DEFAULT_STEP_TABLE, 200).is_ok());
    }

    #[test]
    fn test_custom_revolution() {
        let table = StepTable::new([30; SLOT_COUNT], 420).unwrap();
        assert_eq!(table.steps_per_revolution(), 420);
        assert_eq!(table.steps_for(slot(9)), 30);
    }

    #[test]
    fn test_steps_between_wraps() {
        let table = StepTable::default();
        let walk: heapless::Vec<(Slot, u16), SLOT_COUNT> =
            table.steps_between(slot(12), slot(1)).collect();
        assert_eq!(
            walk.as_slice(),
            &[(slot(12), 14), (slot(13), 14), (slot(0), 14)]
        );
    }

    #[test]
    fn test_steps_between_same_slot_is_empty() {
        let table = StepTable::default();
        assert_eq!(table.steps_between(slot(7), slot(7)).count(), 0);
    }

    #[test]
    fn test_full_lap_minus_one_covers_table() {
        let table = StepTable::default();
        let total: u32 = table
            .steps_between(slot(1), slot(0))
            .map(|(_, steps)| steps as u32)
            .sum();
        assert_eq!(total, STEPS_PER_REVOLUTION - table.steps_for(slot(0)) as u32);
    }
}
