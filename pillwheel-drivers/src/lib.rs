//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pillwheel-core for the carousel hardware:
//!
//! - Step/direction stepper output over GPIO (A4988 class drivers)
//! - The async motor executor that turns rotation plans into timed pulses
//! - Buzzer and LED alert output over GPIO
//! - Simulation outputs for machines without the hardware attached

#![no_std]
#![deny(unsafe_code)]

pub mod alert;
pub mod sim;
pub mod stepper;

#[cfg(test)]
pub(crate) mod testing;
