//! Alarm re-delivery scheduling
//!
//! Calendar matching lives outside the core; the only scheduling the core
//! owns is snooze re-delivery.

pub mod snooze;

pub use snooze::{SnoozeEntry, SnoozeQueue, MAX_SNOOZES};
