//! Board-agnostic core logic for the pill carousel controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware or on an async runtime:
//!
//! - Slot addressing (day/period to compartment) and the step table
//! - Rotation planning (forward-only, table-driven segments)
//! - Jog and maintenance-excursion state
//! - The alarm lifecycle state machine
//! - Snooze re-delivery queue
//! - Hardware capability traits (pulse output, alert output)

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod motion;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use error::Error;
