//! Alarm state machine
//!
//! Defines the authoritative alarm behavior. The machine is explicit,
//! finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::{Acknowledge, AlarmEvent, AlarmTrigger, Effect, Effects, Label};
pub use machine::{AlarmEngine, AlarmSession, AlarmState};
