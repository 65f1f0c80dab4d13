//! Motion sensor task
//!
//! Polls the PIR line and turns each activation into one acknowledgment.
//! Motion while armed is ignored.

use embassy_time::{Duration, Ticker};
use log::{debug, info, trace};

use pillwheel_core::traits::AlertOutput;
use pillwheel_core::Error;
use pillwheel_hal::{EdgeDetector, InputPin};

use crate::controller::Controller;

/// Sensor poll interval in milliseconds
pub const SENSOR_POLL_MS: u64 = 50;

/// Sensor task - polls `pin` for motion edges
pub async fn sensor_task<A: AlertOutput, P: InputPin>(controller: &Controller<A>, pin: P) {
    info!("Sensor task started");

    // The pin applies its own polarity
    let mut edges = EdgeDetector::new();
    let mut ticker = Ticker::every(Duration::from_millis(SENSOR_POLL_MS));

    loop {
        ticker.next().await;

        if !edges.poll(&pin) {
            continue;
        }

        match controller.motion_detected() {
            Ok(()) => info!("Motion detected, alarm dismissed"),
            Err(Error::NotFiring) => trace!("Motion ignored, no alarm firing"),
            Err(e) => debug!("Motion not handled: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embassy_futures::block_on;
    use embassy_futures::select::select;
    use embassy_time::Timer;

    use pillwheel_core::config::AlarmTiming;
    use pillwheel_core::motion::{DayOfWeek, Period, RotationPlanner};
    use pillwheel_core::state::AlarmTrigger;
    use pillwheel_drivers::sim::SimAlert;

    use crate::coordinator::Coordinator;

    struct FakePir<'a>(&'a Cell<bool>);

    impl InputPin for FakePir<'_> {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_motion_dismisses_firing_alarm() {
        let c = Controller::new(
            Coordinator::new(RotationPlanner::default()),
            SimAlert::new(),
            AlarmTiming::default(),
        );
        let level = Cell::new(false);

        let script = async {
            c.trigger_at(
                AlarmTrigger::new(DayOfWeek::Friday, Period::Morning, "07:30 AM"),
                0,
            )
            .unwrap();
            Timer::after_millis(2 * SENSOR_POLL_MS).await;
            assert!(c.alarm_active());

            level.set(true);
            Timer::after_millis(3 * SENSOR_POLL_MS).await;
        };

        let _ = block_on(select(sensor_task(&c, FakePir(&level)), script));

        assert!(!c.alarm_active());
        c.with_alert(|a| assert!(!a.audio_on()));
    }
}
