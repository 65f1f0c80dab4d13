//! Rotation planner
//!
//! Turns "go to slot N" into an ordered list of table-driven segments.
//! Planned rotation is forward-only; every segment advances exactly one
//! slot, so a cancelled plan always leaves the carousel on a compartment
//! boundary.

use heapless::Vec;

use super::position::{Slot, SLOT_COUNT};
use crate::config::StepTable;
use crate::error::Error;
use crate::traits::Direction;

/// One slot-to-slot move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    /// Slot the segment starts from
    pub slot: Slot,
    /// Pulses to emit
    pub steps: u16,
    /// Motor direction
    pub direction: Direction,
}

impl Segment {
    /// Slot reached once every pulse of this segment has been emitted
    pub fn end(&self) -> Slot {
        self.slot.step(self.direction)
    }
}

/// Immutable rotation plan
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotationPlan {
    origin: Slot,
    target: Slot,
    segments: Vec<Segment, SLOT_COUNT>,
}

impl RotationPlan {
    /// Plan that leaves the carousel where it is
    pub fn empty(at: Slot) -> Self {
        Self {
            origin: at,
            target: at,
            segments: Vec::new(),
        }
    }

    /// Slot the plan starts from
    pub fn origin(&self) -> Slot {
        self.origin
    }

    /// Slot reached when the plan runs to completion
    pub fn target(&self) -> Slot {
        self.target
    }

    /// Segments in execution order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when executing the plan is a no-op
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total pulse count across all segments
    pub fn total_steps(&self) -> u32 {
        self.segments.iter().map(|s| s.steps as u32).sum()
    }
}

/// Rotation planner bound to a validated step table
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationPlanner {
    table: StepTable,
}

impl RotationPlanner {
    /// Create a planner over `table`
    pub const fn new(table: StepTable) -> Self {
        Self { table }
    }

    /// Step table in use
    pub fn table(&self) -> &StepTable {
        &self.table
    }

    /// Plan from `current` to a raw target index
    ///
    /// Fails only when `target` is not a slot.
    pub fn plan(&self, current: Slot, target: u8) -> Result<RotationPlan, Error> {
        let target = Slot::new(target)?;
        Ok(self.plan_to(current, target))
    }

    /// Plan from `current` to an already validated target
    pub fn plan_to(&self, current: Slot, target: Slot) -> RotationPlan {
        let mut segments = Vec::new();
        for (slot, steps) in self.table.steps_between(current, target) {
            // At most 13 moves; capacity is one full lap.
            let _ = segments.push(Segment {
                slot,
                steps,
                direction: Direction::Forward,
            });
        }

        RotationPlan {
            origin: current,
            target,
            segments,
        }
    }
}
