//! Alert flash task
//!
//! Toggles the LED at the configured interval while an alarm is firing.
//! Audio is not touched here; it stays on until acknowledgment.

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use log::{debug, info};

use pillwheel_core::traits::AlertOutput;

use crate::controller::{Controller, FlashCommand};

/// Flash task - waits for Start, toggles until Stop or the alarm re-arms
pub async fn flash_task<A: AlertOutput>(controller: &Controller<A>) {
    info!("Flash task started");

    let interval = Duration::from_millis(controller.timing().flash_interval_ms.max(1) as u64);

    loop {
        if controller.flash_command().await != FlashCommand::Start {
            continue;
        }
        debug!("Flash started");

        let mut ticker = Ticker::every(interval);
        let mut led_on = true;

        loop {
            match select(controller.flash_command(), ticker.next()).await {
                Either::First(FlashCommand::Start) => {
                    ticker.reset();
                    led_on = true;
                }
                Either::First(FlashCommand::Stop) => {
                    debug!("Flash stopped");
                    break;
                }
                Either::Second(()) => {
                    led_on = !led_on;
                    if !controller.flash_led(led_on) {
                        debug!("Flash ended with alarm");
                        break;
                    }
                }
            }
        }
    }
}
