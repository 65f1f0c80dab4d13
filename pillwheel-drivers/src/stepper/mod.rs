//! Stepper driver implementations

pub mod executor;
pub mod step_dir;

pub use executor::{ExecutionOutcome, MotorDriver, PulseTiming, SegmentObserver};
pub use step_dir::StepDirOutput;
