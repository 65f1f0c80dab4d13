//! Motion planning
//!
//! Slot addressing, table-driven rotation plans, jog and maintenance
//! excursion state.

pub mod excursion;
pub mod jog;
pub mod planner;
pub mod position;

pub use excursion::Excursion;
pub use jog::{jog_unit, JogState};
pub use planner::{RotationPlan, RotationPlanner, Segment};
pub use position::{DayOfWeek, Period, Slot, SLOT_COUNT};
