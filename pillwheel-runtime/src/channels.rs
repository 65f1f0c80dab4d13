//! Inter-task communication channels
//!
//! Static channels shared between the stdin reader thread and the Embassy
//! tasks. Everything else goes through the controller.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::console::Command;

/// Channel capacity for console commands
const CONSOLE_CHANNEL_SIZE: usize = 8;

/// Operator commands parsed from stdin
pub static CONSOLE_CHANNEL: Channel<CriticalSectionRawMutex, Command, CONSOLE_CHANNEL_SIZE> =
    Channel::new();
