//! Hardware capability traits
//!
//! These traits define the interface between the application logic
//! and the device (or simulation) implementations.

pub mod alert;
pub mod stepper;

pub use alert::AlertOutput;
pub use stepper::{Direction, PulseOutput};
