//! Pillwheel runtime
//!
//! Host side of the pill carousel: configuration, hardware selection, the
//! controller that owns alarm and motor state, and the Embassy tasks that
//! drive them. The binary in `main.rs` wires these together.

pub mod channels;
pub mod config;
pub mod console;
pub mod controller;
pub mod coordinator;
pub mod hardware;
pub mod tasks;

#[cfg(test)]
mod testing;

// Link the executor into the test binary; embassy-time's timer queue
// resolves its waker hook from it.
#[cfg(test)]
use embassy_executor as _;

pub use controller::{Controller, Status};
pub use coordinator::{Coordinator, Motion, MotionRequest, Priority};

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embassy_futures::select::select;
    use embassy_futures::yield_now;

    use pillwheel_core::config::{AlarmTiming, MotorTiming, DEFAULT_STEP_TABLE};
    use pillwheel_core::motion::{DayOfWeek, Period, RotationPlanner, Slot};
    use pillwheel_core::state::{Acknowledge, AlarmTrigger};
    use pillwheel_core::traits::Direction;
    use pillwheel_drivers::sim::{SimAlert, SimPulseOutput};
    use pillwheel_drivers::stepper::MotorDriver;

    use super::*;
    use crate::tasks::motor_task;
    use crate::testing::YieldDelay;

    fn controller() -> Controller<SimAlert> {
        Controller::new(
            Coordinator::new(RotationPlanner::default()),
            SimAlert::new(),
            AlarmTiming::default(),
        )
    }

    fn motor() -> MotorDriver<SimPulseOutput, YieldDelay> {
        MotorDriver::new(SimPulseOutput::new(), YieldDelay, MotorTiming::default())
    }

    async fn until(done: impl Fn() -> bool) {
        while !done() {
            yield_now().await;
        }
    }

    #[test]
    fn test_alarm_rotates_to_dose_with_alert_on() {
        let c = controller();
        let mut m = motor();
        let wednesday_morning = Slot::new(6).unwrap();

        let script = async {
            c.trigger_at(self::wednesday_morning(), 0).unwrap();

            // Alert stays on for the whole rotation
            while !(c.coordinator().is_idle() && c.current_slot() == wednesday_morning) {
                assert!(c.alarm_active());
                c.with_alert(|a| assert!(a.audio_on()));
                yield_now().await;
            }
        };

        let _ = block_on(select(motor_task(c.coordinator(), &mut m), script));

        let expected: u32 = DEFAULT_STEP_TABLE[..6].iter().map(|&s| s as u32).sum();
        assert_eq!(m.output().total_pulses(), expected);
        assert!(c.alarm_active());
        c.with_alert(|a| assert_eq!(a.audio_activations(), 1));

        c.acknowledge_at(Acknowledge::Stop, 1_000).unwrap();
        assert_eq!(c.current_slot(), wednesday_morning);
        c.with_alert(|a| assert!(!a.audio_on() && !a.led_on()));
    }

    fn wednesday_morning() -> AlarmTrigger {
        AlarmTrigger::new(DayOfWeek::Wednesday, Period::Morning, "08:00 AM")
    }

    #[test]
    fn test_alarm_while_jog_requested_still_rotates() {
        let c = controller();
        let mut m = motor();

        let script = async {
            // Jog pressed, alarm fires and jog released before the motor
            // task picks up anything
            c.request_jog(Direction::Forward, true).unwrap();
            c.trigger_at(wednesday_morning(), 0).unwrap();
            c.request_jog(Direction::Forward, false).unwrap();
            until(|| c.coordinator().is_idle()).await;
        };

        let _ = block_on(select(motor_task(c.coordinator(), &mut m), script));
        assert!(c.alarm_active());
        assert_eq!(c.current_slot(), Slot::new(6).unwrap());
    }

    #[test]
    fn test_jog_repress_keeps_alarm_rotation() {
        let c = controller();
        let mut m = motor();

        let script = async {
            c.request_jog(Direction::Forward, true).unwrap();
            until(|| c.coordinator().motion() == Motion::Jogging(Direction::Forward)).await;
            c.trigger_at(wednesday_morning(), 0).unwrap();

            // Key repeat on the held button
            c.request_jog(Direction::Forward, true).unwrap();
            for _ in 0..37 {
                yield_now().await;
            }
            c.request_jog(Direction::Forward, false).unwrap();
            until(|| c.coordinator().is_idle()).await;
        };

        let _ = block_on(select(motor_task(c.coordinator(), &mut m), script));
        assert!(c.alarm_active());
        assert_eq!(c.current_slot(), Slot::new(6).unwrap());
    }

    #[test]
    fn test_alarm_preempts_manual_rotation() {
        let c = controller();
        let mut m = motor();
        let two = Slot::new(2).unwrap();

        let script = async {
            c.request_manual_rotation(10).unwrap();
            until(|| c.current_slot() == two).await;
            c.trigger_at(wednesday_morning(), 0).unwrap();
            until(|| c.coordinator().is_idle()).await;
        };

        let _ = block_on(select(motor_task(c.coordinator(), &mut m), script));

        // Forward only and never past the alarm slot
        let (forward, reverse) = m.output().pulses();
        let expected: u32 = DEFAULT_STEP_TABLE[..6].iter().map(|&s| s as u32).sum();
        assert_eq!((forward, reverse), (expected, 0));
        assert_eq!(c.current_slot(), Slot::new(6).unwrap());
    }

    #[test]
    fn test_excursion_end_during_jog_unit_restores() {
        let c = controller();
        let mut m = motor();

        let script = async {
            assert!(c.coordinator().begin_excursion());
            c.request_jog(Direction::Forward, true).unwrap();
            until(|| c.coordinator().motion() == Motion::Jogging(Direction::Forward)).await;

            // The first jog pulse is still in flight
            assert_eq!(c.coordinator().end_excursion(), Ok(Some(Slot::HOME)));
            until(|| c.coordinator().is_idle()).await;
        };

        let _ = block_on(select(motor_task(c.coordinator(), &mut m), script));
        assert_eq!(c.current_slot(), Slot::HOME);
        assert!(m.output().total_pulses() > 0);
    }

    #[test]
    fn test_manual_pick_while_idle() {
        let c = controller();
        let mut m = motor();

        let script = async {
            c.request_manual_rotation(3).unwrap();
            until(|| c.coordinator().is_idle()).await;
            c.reset().unwrap();
            until(|| c.coordinator().is_idle()).await;
        };

        let _ = block_on(select(motor_task(c.coordinator(), &mut m), script));

        // Forward only: 0 -> 3, then 3 -> 0 the long way round
        let (forward, reverse) = m.output().pulses();
        assert_eq!(reverse, 0);
        assert_eq!(forward, 200);
        assert_eq!(c.current_slot(), Slot::HOME);
    }

    #[test]
    fn test_maintenance_excursion_restores_slot() {
        let c = controller();
        let mut m = motor();

        let script = async {
            c.request_manual_rotation(5).unwrap();
            until(|| c.coordinator().is_idle()).await;

            assert!(c.coordinator().begin_excursion());
            c.request_jog(Direction::Reverse, true).unwrap();
            until(|| c.current_slot() != Slot::new(5).unwrap()).await;
            c.request_jog(Direction::Reverse, false).unwrap();
            until(|| c.coordinator().is_idle()).await;

            assert!(c.coordinator().end_excursion().unwrap().is_some());
            until(|| c.coordinator().is_idle()).await;
        };

        let _ = block_on(select(motor_task(c.coordinator(), &mut m), script));
        assert_eq!(c.current_slot(), Slot::new(5).unwrap());
    }
}
