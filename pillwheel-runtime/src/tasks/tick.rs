//! Scheduler tick task
//!
//! Runs at least once per second and re-delivers snoozed alarms whose due
//! time has passed.

use embassy_time::{Duration, Ticker};
use log::{debug, info};

use pillwheel_core::traits::AlertOutput;

use crate::controller::{now_ms, Controller};

/// Tick task - polls the snooze queue
pub async fn tick_task<A: AlertOutput>(controller: &Controller<A>) {
    let period_ms = controller.timing().effective_tick_ms();
    info!("Tick task started ({} ms)", period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(period_ms as u64));

    loop {
        ticker.next().await;

        let delivered = controller.poll_snoozes(now_ms());
        if delivered > 0 {
            debug!("Tick re-delivered {} snooze(s)", delivered);
        }
    }
}
