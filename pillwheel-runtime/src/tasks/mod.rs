//! Embassy async tasks
//!
//! Each task runs independently and talks to the others only through the
//! controller, the coordinator and the console channel.

pub mod console;
pub mod display;
pub mod flash;
pub mod motor;
pub mod sensor;
pub mod tick;

pub use console::{console_task, spawn_stdin_reader};
pub use display::display_task;
pub use flash::flash_task;
pub use motor::motor_task;
pub use sensor::{sensor_task, SENSOR_POLL_MS};
pub use tick::tick_task;
