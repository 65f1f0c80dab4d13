//! Pillwheel - weekly pill carousel controller
//!
//! Host binary for Linux single-board computers. Drives a 14-compartment
//! carousel (one per day and dose period) with a step/dir stepper, raises
//! an LED and buzzer alert when a dose is due, and takes acknowledgments
//! from the console or a PIR motion sensor.
//!
//! Usage: `pillwheel [config.toml]`

use std::path::PathBuf;

use embassy_executor::Spawner;
use embassy_futures::join::{join, join3};
use embassy_time::Delay;
use log::{error, info, warn};

use pillwheel_core::motion::RotationPlanner;
use pillwheel_drivers::stepper::MotorDriver;

use pillwheel_runtime::config::load_config;
use pillwheel_runtime::hardware::open_hardware;
use pillwheel_runtime::tasks;
use pillwheel_runtime::{Controller, Coordinator};

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    info!("Pillwheel starting...");

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match load_config(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Configuration loaded: {} steps/rev, snooze {} min",
        config.step_table.steps_per_revolution(),
        config.alarm.snooze_minutes
    );

    let hardware = open_hardware(&config.hardware);

    let mut motor = MotorDriver::new(hardware.pulse, Delay, config.motor);
    let controller = Controller::new(
        Coordinator::new(RotationPlanner::new(config.step_table)),
        hardware.alert,
        config.alarm,
    );
    info!("Carousel assumed at slot {}", controller.current_slot());

    if let Err(e) = tasks::spawn_stdin_reader() {
        warn!("Console unavailable: {}", e);
    }

    let sensor = async {
        match hardware.motion {
            Some(pin) => tasks::sensor_task(&controller, pin).await,
            None => core::future::pending::<()>().await,
        }
    };

    info!("All tasks started, controller running");

    join(
        join3(
            tasks::motor_task(controller.coordinator(), &mut motor),
            tasks::flash_task(&controller),
            tasks::tick_task(&controller),
        ),
        join3(
            tasks::display_task(&controller),
            tasks::console_task(&controller),
            sensor,
        ),
    )
    .await;
}
