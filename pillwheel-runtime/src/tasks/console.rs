//! Console task
//!
//! A blocking reader thread parses stdin into commands and hands them to
//! the executor through `CONSOLE_CHANNEL`. The task side applies each
//! command to the controller and logs the outcome.

use std::io::BufRead;
use std::thread;

use log::{error, info, warn};

use pillwheel_core::traits::{AlertOutput, Direction};
use pillwheel_core::Error;

use crate::channels::CONSOLE_CHANNEL;
use crate::console::{parse_command, Command, HELP};
use crate::controller::{now_ms, Controller};
use crate::tasks::display::describe;

/// Start the stdin reader thread
pub fn spawn_stdin_reader() -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("console".into())
        .spawn(|| {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Console read failed: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => embassy_futures::block_on(CONSOLE_CHANNEL.send(command)),
                    Err(e) => warn!("{}", e),
                }
            }
            info!("Console closed");
        })
}

/// Apply one command to the controller
pub fn execute<A: AlertOutput>(controller: &Controller<A>, command: Command) -> Result<(), Error> {
    match command {
        Command::Trigger(trigger) => controller.trigger_at(trigger, now_ms()),
        Command::Goto(slot) => controller.request_manual_rotation(slot),
        Command::Reset => controller.reset(),
        Command::Jog(direction) => controller.request_jog(direction, true),
        Command::Release => controller.request_jog(Direction::Forward, false),
        Command::Stop => controller.stop(),
        Command::Snooze(minutes) => controller.snooze(minutes),
        Command::Motion => controller.motion_detected(),
        Command::Debug(true) => {
            if !controller.coordinator().begin_excursion() {
                info!("Already in maintenance mode");
            }
            Ok(())
        }
        Command::Debug(false) => controller.coordinator().end_excursion().map(|_| ()),
        Command::Led(on) => controller.test_led(on),
        Command::Audio(on) => controller.test_audio(on),
        Command::Status => {
            info!("{}", describe(&controller.status()));
            let now = now_ms();
            for (due_ms, trigger) in controller.pending_snoozes() {
                info!(
                    "  snoozed: {} {} \"{}\" in {} s",
                    trigger.day,
                    trigger.period,
                    trigger.label,
                    due_ms.saturating_sub(now) / 1000
                );
            }
            Ok(())
        }
        Command::Help => {
            info!("{}", HELP);
            Ok(())
        }
    }
}

/// Console task - applies commands from the reader thread
pub async fn console_task<A: AlertOutput>(controller: &Controller<A>) {
    info!("Console task started (type 'help')");

    loop {
        let command = CONSOLE_CHANNEL.receive().await;
        if let Err(e) = execute(controller, command.clone()) {
            warn!("{:?}: {}", command, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillwheel_core::config::AlarmTiming;
    use pillwheel_core::motion::{RotationPlanner, Slot};
    use pillwheel_drivers::sim::SimAlert;

    use crate::console::parse_command;
    use crate::coordinator::{Coordinator, MotionRequest, Priority};

    fn controller() -> Controller<SimAlert> {
        Controller::new(
            Coordinator::new(RotationPlanner::default()),
            SimAlert::new(),
            AlarmTiming::default(),
        )
    }

    fn run(c: &Controller<SimAlert>, line: &str) -> Result<(), Error> {
        execute(c, parse_command(line).unwrap())
    }

    #[test]
    fn test_goto_validates_slot() {
        let c = controller();
        assert_eq!(run(&c, "goto 14"), Err(Error::InvalidSlot(14)));
        assert!(c.coordinator().is_idle());

        run(&c, "goto 9").unwrap();
        assert_eq!(
            embassy_futures::block_on(c.coordinator().next_job()),
            MotionRequest::Rotate {
                target: Slot::new(9).unwrap(),
                priority: Priority::Manual
            }
        );
    }

    #[test]
    fn test_acknowledge_without_alarm() {
        let c = controller();
        assert_eq!(run(&c, "stop"), Err(Error::NotFiring));
        assert_eq!(run(&c, "snooze"), Err(Error::NotFiring));
        assert_eq!(run(&c, "motion"), Err(Error::NotFiring));
    }

    #[test]
    fn test_trigger_then_snooze() {
        let c = controller();
        run(&c, "trigger fri evening pills").unwrap();
        assert!(c.alarm_active());
        assert_eq!(run(&c, "led on"), Err(Error::AlreadyFiring));

        run(&c, "snooze 1").unwrap();
        assert!(!c.alarm_active());
        assert_eq!(c.pending_snoozes().len(), 1);
        run(&c, "status").unwrap();
    }

    #[test]
    fn test_debug_round_trip_without_motion() {
        let c = controller();
        run(&c, "debug enter").unwrap();
        run(&c, "debug enter").unwrap();
        run(&c, "debug leave").unwrap();
        assert!(c.coordinator().is_idle());
    }

    #[test]
    fn test_release_without_jog() {
        let c = controller();
        run(&c, "release").unwrap();
        run(&c, "jog fwd").unwrap();
        run(&c, "release").unwrap();
        assert!(c.coordinator().is_idle());
    }
}
