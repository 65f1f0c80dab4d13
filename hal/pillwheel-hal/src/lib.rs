//! Pillwheel Hardware Abstraction Layer
//!
//! This crate defines the digital I/O traits the carousel drivers are
//! written against. Board support crates implement them for a concrete
//! platform, so the same drivers run on a Raspberry Pi, a microcontroller,
//! or a test harness with mock pins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pillwheel-drivers / pillwheel-runtime  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pillwheel-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ pillwheel-hal-    │
//!           │      linux        │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - step, direction, LED and buzzer lines
//! - [`gpio::InputPin`] - motion sensor line
//!
//! [`gpio::EdgeDetector`] turns a polled input into rising-edge events.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{EdgeDetector, InputPin, OutputPin};
