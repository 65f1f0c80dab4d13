//! Hardware selection
//!
//! Each capability (stepper lines, alert lines, motion sensor) is opened
//! independently at startup. A capability whose lines cannot be opened is
//! replaced by its simulation and the substitution is logged; nothing here
//! is fatal.

use std::path::Path;

use log::{debug, info, warn};

use pillwheel_core::traits::{AlertOutput, Direction, PulseOutput};
use pillwheel_core::Error;
use pillwheel_drivers::alert::GpioAlert;
use pillwheel_drivers::sim::{SimAlert, SimPulseOutput};
use pillwheel_drivers::stepper::StepDirOutput;
use pillwheel_hal::OutputPin;
use pillwheel_hal_linux::{GpioAllocator, GpioError, SysfsInput, SysfsOutput, SYSFS_GPIO_ROOT};

use crate::config::{Backend, HardwareConfig};

/// Stepper output chosen at startup
pub enum HostPulse {
    Gpio(StepDirOutput<SysfsOutput, SysfsOutput>),
    Sim(SimPulseOutput),
}

impl HostPulse {
    pub fn is_simulated(&self) -> bool {
        matches!(self, HostPulse::Sim(_))
    }
}

impl PulseOutput for HostPulse {
    fn set_direction(&mut self, direction: Direction) {
        match self {
            HostPulse::Gpio(output) => output.set_direction(direction),
            HostPulse::Sim(output) => {
                let (forward, reverse) = output.pulses();
                debug!(
                    "[sim] direction {:?} ({} fwd / {} rev steps so far)",
                    direction, forward, reverse
                );
                output.set_direction(direction)
            }
        }
    }

    fn set_step(&mut self, high: bool) {
        match self {
            HostPulse::Gpio(output) => output.set_step(high),
            HostPulse::Sim(output) => output.set_step(high),
        }
    }
}

/// Buzzer line, or a latch when the board has none
pub enum Buzzer {
    Line(SysfsOutput),
    Absent { high: bool },
}

impl OutputPin for Buzzer {
    fn set_high(&mut self) {
        match self {
            Buzzer::Line(pin) => pin.set_high(),
            Buzzer::Absent { high } => *high = true,
        }
    }

    fn set_low(&mut self) {
        match self {
            Buzzer::Line(pin) => pin.set_low(),
            Buzzer::Absent { high } => *high = false,
        }
    }

    fn is_set_high(&self) -> bool {
        match self {
            Buzzer::Line(pin) => pin.is_set_high(),
            Buzzer::Absent { high } => *high,
        }
    }
}

/// Alert output chosen at startup
pub enum HostAlert {
    Gpio(GpioAlert<SysfsOutput, Buzzer>),
    Sim(SimAlert),
}

impl HostAlert {
    pub fn is_simulated(&self) -> bool {
        matches!(self, HostAlert::Sim(_))
    }
}

impl AlertOutput for HostAlert {
    fn set_audio(&mut self, on: bool) {
        match self {
            HostAlert::Gpio(alert) => alert.set_audio(on),
            HostAlert::Sim(alert) => {
                info!("[sim] audio {}", if on { "on" } else { "off" });
                alert.set_audio(on)
            }
        }
    }

    fn set_led(&mut self, on: bool) {
        match self {
            HostAlert::Gpio(alert) => alert.set_led(on),
            HostAlert::Sim(alert) => alert.set_led(on),
        }
    }
}

/// Everything the runtime drives
pub struct Hardware {
    pub pulse: HostPulse,
    pub alert: HostAlert,
    pub motion: Option<SysfsInput>,
}

impl Hardware {
    /// All-simulated hardware
    pub fn simulated() -> Self {
        Self {
            pulse: HostPulse::Sim(SimPulseOutput::new()),
            alert: HostAlert::Sim(SimAlert::new()),
            motion: None,
        }
    }
}

/// Open the configured hardware under the system sysfs root
pub fn open_hardware(config: &HardwareConfig) -> Hardware {
    open_hardware_at(Path::new(SYSFS_GPIO_ROOT), config)
}

/// Open the configured hardware under `root`
pub fn open_hardware_at(root: &Path, config: &HardwareConfig) -> Hardware {
    if config.backend == Backend::Simulation {
        info!("Simulation backend selected");
        return Hardware::simulated();
    }

    let mut allocator = GpioAllocator::new();

    let pulse = match open_pulse(root, &mut allocator, config) {
        Ok(output) => {
            info!(
                "Stepper on gpio{} (step) / gpio{} (dir)",
                config.step.0, config.dir.0
            );
            HostPulse::Gpio(output)
        }
        Err(e) => {
            warn!("{} for stepper ({}), simulating", Error::HardwareUnavailable, e);
            HostPulse::Sim(SimPulseOutput::new())
        }
    };

    let alert = match open_alert(root, &mut allocator, config) {
        Ok(alert) => {
            info!("Alert LED on gpio{}", config.led.0);
            HostAlert::Gpio(alert)
        }
        Err(e) => {
            warn!("{} for alert ({}), simulating", Error::HardwareUnavailable, e);
            HostAlert::Sim(SimAlert::new())
        }
    };

    let motion = config.motion.and_then(|(pin, inverted)| {
        let opened = allocator
            .allocate(pin)
            .and_then(|_| SysfsInput::open_at(root, pin, inverted));
        match opened {
            Ok(input) => {
                info!("Motion sensor on gpio{}", pin);
                Some(input)
            }
            Err(e) => {
                warn!("Motion sensor unavailable ({}), acknowledge by button only", e);
                None
            }
        }
    });

    Hardware {
        pulse,
        alert,
        motion,
    }
}

fn open_output(
    root: &Path,
    allocator: &mut GpioAllocator,
    (pin, inverted): (u8, bool),
) -> Result<SysfsOutput, GpioError> {
    allocator.allocate(pin)?;
    SysfsOutput::open_at(root, pin, inverted).inspect_err(|_| allocator.release(pin))
}

fn open_pulse(
    root: &Path,
    allocator: &mut GpioAllocator,
    config: &HardwareConfig,
) -> Result<StepDirOutput<SysfsOutput, SysfsOutput>, GpioError> {
    let step = open_output(root, allocator, config.step)?;
    let dir = open_output(root, allocator, config.dir).inspect_err(|_| allocator.release(step.pin()))?;
    // Polarity already handled by the pins
    Ok(StepDirOutput::new(step, dir, false))
}

fn open_alert(
    root: &Path,
    allocator: &mut GpioAllocator,
    config: &HardwareConfig,
) -> Result<GpioAlert<SysfsOutput, Buzzer>, GpioError> {
    let led = open_output(root, allocator, config.led)?;
    let buzzer = match config.buzzer {
        Some(pin) => Buzzer::Line(
            open_output(root, allocator, pin).inspect_err(|_| allocator.release(led.pin()))?,
        ),
        None => Buzzer::Absent { high: false },
    };
    Ok(GpioAlert::new(led, buzzer))
}
