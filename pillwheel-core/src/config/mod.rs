//! Configuration types
//!
//! Board-agnostic configuration: the step table and the timing parameters
//! the runtime loads from its TOML file.

pub mod step_table;
pub mod types;

pub use step_table::*;
pub use types::*;
