//! GPIO allocation and sysfs pin drivers
//!
//! Tracks which BCM lines are in use and drives them through the kernel's
//! sysfs GPIO interface (`/sys/class/gpio`). Opening a pin fails with a
//! typed [`GpioError`] when the interface is missing, which the runtime
//! treats as "no hardware present" and answers by simulating instead.

use core::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use heapless::FnvIndexSet;
use log::{debug, warn};
use pillwheel_hal::{InputPin, OutputPin};

/// Number of user GPIO lines on the Raspberry Pi header (BCM 0-27)
pub const GPIO_COUNT: usize = 28;

/// Default sysfs GPIO root
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// udev needs a moment to fix up permissions after an export
const ATTR_RETRIES: u32 = 10;
const ATTR_RETRY_DELAY: Duration = Duration::from_millis(20);

/// GPIO errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Pin number out of range or malformed pin string
    InvalidPin,
    /// Pin already claimed by another function
    AlreadyAllocated(u8),
    /// Export through sysfs failed
    Export { pin: u8, kind: io::ErrorKind },
    /// Setting the line direction failed
    Direction { pin: u8, kind: io::ErrorKind },
    /// Opening the value attribute failed
    Value { pin: u8, kind: io::ErrorKind },
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::InvalidPin => write!(f, "invalid GPIO pin"),
            GpioError::AlreadyAllocated(pin) => write!(f, "gpio{} already allocated", pin),
            GpioError::Export { pin, kind } => write!(f, "gpio{} export failed: {:?}", pin, kind),
            GpioError::Direction { pin, kind } => {
                write!(f, "gpio{} direction setup failed: {:?}", pin, kind)
            }
            GpioError::Value { pin, kind } => write!(f, "gpio{} value open failed: {:?}", pin, kind),
        }
    }
}

impl std::error::Error for GpioError {}

/// GPIO allocator to track pin usage
pub struct GpioAllocator {
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    /// Create a new GPIO allocator
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Claim a GPIO line
    pub fn allocate(&mut self, pin: u8) -> Result<(), GpioError> {
        if pin as usize >= GPIO_COUNT {
            return Err(GpioError::InvalidPin);
        }
        if self.allocated.contains(&pin) {
            return Err(GpioError::AlreadyAllocated(pin));
        }
        self.allocated
            .insert(pin)
            .map_err(|_| GpioError::AlreadyAllocated(pin))?;
        Ok(())
    }

    /// Release a GPIO line
    pub fn release(&mut self, pin: u8) {
        self.allocated.remove(&pin);
    }

    /// Check if a line is claimed
    pub fn is_allocated(&self, pin: u8) -> bool {
        self.allocated.contains(&pin)
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio21" -> (21, false)
/// - "!gpio14" -> (14, true) (inverted/active-low)
pub fn parse_pin_string(s: &str) -> Option<(u8, bool)> {
    let s = s.trim();

    let (s, inverted) = match s.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    let pin: u8 = s.strip_prefix("gpio")?.parse().ok()?;

    if pin as usize >= GPIO_COUNT {
        return None;
    }

    Some((pin, inverted))
}

fn export(root: &Path, pin: u8) -> Result<PathBuf, GpioError> {
    let dir = root.join(format!("gpio{}", pin));
    if dir.exists() {
        return Ok(dir);
    }

    let export_err = |e: io::Error| GpioError::Export { pin, kind: e.kind() };
    let mut export = OpenOptions::new()
        .write(true)
        .open(root.join("export"))
        .map_err(export_err)?;
    export
        .write_all(pin.to_string().as_bytes())
        .map_err(export_err)?;

    for _ in 0..ATTR_RETRIES {
        if dir.exists() {
            debug!("gpio{} exported", pin);
            return Ok(dir);
        }
        thread::sleep(ATTR_RETRY_DELAY);
    }
    Err(GpioError::Export {
        pin,
        kind: io::ErrorKind::NotFound,
    })
}

fn write_attr(path: &Path, value: &str) -> io::Result<()> {
    let mut last = io::Error::from(io::ErrorKind::NotFound);
    for _ in 0..ATTR_RETRIES {
        match fs::write(path, value) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                last = e;
                thread::sleep(ATTR_RETRY_DELAY);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last)
}

/// Output line driven through sysfs
///
/// Write failures after a successful open are latched into a fault flag
/// and logged once; the pin keeps accepting calls so a flaky line cannot
/// stall the motor task.
pub struct SysfsOutput {
    pin: u8,
    inverted: bool,
    high: bool,
    fault: bool,
    value: File,
}

impl SysfsOutput {
    /// Export and configure `pin` as an output under the default root
    pub fn open(pin: u8, inverted: bool) -> Result<Self, GpioError> {
        Self::open_at(Path::new(SYSFS_GPIO_ROOT), pin, inverted)
    }

    /// Export and configure `pin` as an output under `root`
    pub fn open_at(root: &Path, pin: u8, inverted: bool) -> Result<Self, GpioError> {
        if pin as usize >= GPIO_COUNT {
            return Err(GpioError::InvalidPin);
        }
        let dir = export(root, pin)?;
        write_attr(&dir.join("direction"), "out")
            .map_err(|e| GpioError::Direction { pin, kind: e.kind() })?;
        let value = OpenOptions::new()
            .read(true)
            .write(true)
            .open(dir.join("value"))
            .map_err(|e| GpioError::Value { pin, kind: e.kind() })?;

        let mut out = Self {
            pin,
            inverted,
            high: false,
            fault: false,
            value,
        };
        // Start de-asserted
        out.write_level(false);
        Ok(out)
    }

    /// BCM line number
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// True once any write to the line has failed
    pub fn has_fault(&self) -> bool {
        self.fault
    }

    fn write_level(&mut self, logical_high: bool) {
        let physical = logical_high != self.inverted;
        let byte: &[u8] = if physical { b"1" } else { b"0" };
        let result = self
            .value
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.value.write_all(byte));
        if let Err(e) = result {
            if !self.fault {
                warn!("gpio{} write failed: {}", self.pin, e);
            }
            self.fault = true;
        }
        self.high = logical_high;
    }
}

impl OutputPin for SysfsOutput {
    fn set_high(&mut self) {
        self.write_level(true);
    }

    fn set_low(&mut self) {
        self.write_level(false);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Input line read through sysfs
pub struct SysfsInput {
    pin: u8,
    inverted: bool,
    value: File,
}

impl SysfsInput {
    /// Export and configure `pin` as an input under the default root
    pub fn open(pin: u8, inverted: bool) -> Result<Self, GpioError> {
        Self::open_at(Path::new(SYSFS_GPIO_ROOT), pin, inverted)
    }

    /// Export and configure `pin` as an input under `root`
    pub fn open_at(root: &Path, pin: u8, inverted: bool) -> Result<Self, GpioError> {
        if pin as usize >= GPIO_COUNT {
            return Err(GpioError::InvalidPin);
        }
        let dir = export(root, pin)?;
        write_attr(&dir.join("direction"), "in")
            .map_err(|e| GpioError::Direction { pin, kind: e.kind() })?;
        let value = File::open(dir.join("value"))
            .map_err(|e| GpioError::Value { pin, kind: e.kind() })?;
        Ok(Self {
            pin,
            inverted,
            value,
        })
    }

    /// BCM line number
    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl InputPin for SysfsInput {
    fn is_high(&self) -> bool {
        let mut byte = [0u8; 1];
        let mut file = &self.value;
        let physical = match file.seek(SeekFrom::Start(0)).and_then(|_| file.read(&mut byte)) {
            Ok(1) => byte[0] == b'1',
            _ => false,
        };
        physical != self.inverted
    }
}
