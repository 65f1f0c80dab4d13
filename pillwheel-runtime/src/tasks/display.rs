//! Display task
//!
//! Stand-in for the presentation layer: reports every status change
//! (position, alarm state, motion progress) to the log.

use log::info;

use pillwheel_core::traits::AlertOutput;

use crate::controller::{Controller, Status};
use crate::coordinator::Motion;

/// Render a status line
pub fn describe(status: &Status) -> String {
    let motion = match status.motion {
        Motion::Idle => "idle".to_string(),
        Motion::Rotating {
            target,
            completed,
            total,
        } => format!("rotating to {} ({}/{})", target.index(), completed, total),
        Motion::Jogging(direction) => format!("jogging {:?}", direction),
    };
    format!(
        "slot {} ({} {}), alarm {}, {}",
        status.slot.index(),
        status.slot.day(),
        status.slot.period(),
        if status.alarm_active { "FIRING" } else { "armed" },
        motion
    )
}

/// Display task - logs status whenever it changes
pub async fn display_task<A: AlertOutput>(controller: &Controller<A>) {
    let mut last = controller.status();
    info!("{}", describe(&last));

    loop {
        controller.coordinator().changed().await;

        let status = controller.status();
        if status != last {
            info!("{}", describe(&status));
            last = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillwheel_core::motion::Slot;

    #[test]
    fn test_describe() {
        let status = Status {
            slot: Slot::new(6).unwrap(),
            alarm_active: true,
            motion: Motion::Rotating {
                target: Slot::new(9).unwrap(),
                completed: 1,
                total: 3,
            },
        };
        assert_eq!(
            describe(&status),
            "slot 6 (Wednesday Morning), alarm FIRING, rotating to 9 (1/3)"
        );
    }
}
