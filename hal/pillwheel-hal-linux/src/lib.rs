//! Linux HAL for the carousel controller
//!
//! This crate provides Raspberry Pi / Linux implementations:
//! - GPIO allocation and pin-string parsing for config-driven setup
//! - sysfs-backed output and input pins implementing the `pillwheel-hal`
//!   traits

#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{parse_pin_string, GpioAllocator, GpioError, SysfsInput, SysfsOutput, SYSFS_GPIO_ROOT};
