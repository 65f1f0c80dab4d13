//! Slot addressing
//!
//! The carousel has one compartment per (day, period) pair. Slot 0 is
//! Sunday morning; slots increase day-major, period-minor:
//!
//! ```text
//! slot = day_index * 2 + (0 for Morning, 1 for Evening)
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::Error;
use crate::traits::Direction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of compartments on the carousel
pub const SLOT_COUNT: usize = 14;

/// Day of the week, Sunday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// All days in carousel order
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Index with Sunday = 0
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Day from index (wraps modulo 7)
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[(index % 7) as usize]
    }

    /// English day name
    pub const fn name(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = ();

    /// Accepts full names and three-letter abbreviations, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|day| {
                let name = day.name();
                s.eq_ignore_ascii_case(name)
                    || (s.len() == 3 && s.eq_ignore_ascii_case(&name[..3]))
            })
            .ok_or(())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dose period within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Period {
    Morning,
    Evening,
}

impl Period {
    /// Offset of this period within its day
    pub const fn offset(self) -> u8 {
        match self {
            Period::Morning => 0,
            Period::Evening => 1,
        }
    }

    /// Period name
    pub const fn name(self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Evening => "Evening",
        }
    }
}

impl FromStr for Period {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("morning") || s.eq_ignore_ascii_case("am") {
            Ok(Period::Morning)
        } else if s.eq_ignore_ascii_case("evening") || s.eq_ignore_ascii_case("pm") {
            Ok(Period::Evening)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Carousel compartment index, always in `0..SLOT_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot(u8);

impl Slot {
    /// Sunday morning; the reset position
    pub const HOME: Slot = Slot(0);

    /// Validate a raw slot index
    pub const fn new(index: u8) -> Result<Self, Error> {
        if (index as usize) < SLOT_COUNT {
            Ok(Slot(index))
        } else {
            Err(Error::InvalidSlot(index))
        }
    }

    /// Compartment for a (day, period) dose
    pub const fn for_dose(day: DayOfWeek, period: Period) -> Self {
        Slot(day.index() * 2 + period.offset())
    }

    /// Raw index
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Day this compartment belongs to
    pub const fn day(self) -> DayOfWeek {
        DayOfWeek::from_index(self.0 / 2)
    }

    /// Period this compartment belongs to
    pub const fn period(self) -> Period {
        if self.0 % 2 == 0 {
            Period::Morning
        } else {
            Period::Evening
        }
    }

    /// Slot `n` positions further forward, wrapping
    pub const fn advance(self, n: u8) -> Self {
        Slot(((self.0 as usize + n as usize) % SLOT_COUNT) as u8)
    }

    /// Next slot forward
    pub const fn next(self) -> Self {
        self.advance(1)
    }

    /// Previous slot, wrapping from 0 to 13
    pub const fn prev(self) -> Self {
        self.advance(SLOT_COUNT as u8 - 1)
    }

    /// One slot in `direction`
    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Forward => self.next(),
            Direction::Reverse => self.prev(),
        }
    }

    /// Forward distance `(to - self) mod 14`
    pub const fn distance_to(self, to: Slot) -> u8 {
        ((to.0 as usize + SLOT_COUNT - self.0 as usize) % SLOT_COUNT) as u8
    }

    /// Iterate all slots in order
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOT_COUNT as u8).map(Slot)
    }
}

impl TryFrom<u8> for Slot {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Slot::new(index)
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.0, self.day(), self.period())
    }
}
