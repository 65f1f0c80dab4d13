//! Motor task
//!
//! The only flow of control that drives the motor or writes the carousel
//! position. Waits for the coordinator to hand it a job, runs it, and
//! checks for cancellation at every slot boundary (or jog pulse).

use embedded_hal_async::delay::DelayNs;
use log::{debug, info};

use pillwheel_core::traits::{Direction, PulseOutput};
use pillwheel_drivers::stepper::MotorDriver;

use crate::coordinator::{Coordinator, MotionRequest};

/// Motor task - runs jobs forever
pub async fn motor_task<P: PulseOutput, D: DelayNs>(
    coordinator: &Coordinator,
    motor: &mut MotorDriver<P, D>,
) {
    info!("Motor task started");

    loop {
        match coordinator.next_job().await {
            MotionRequest::Rotate { target, priority } => {
                let from = coordinator.current_position();
                let plan = coordinator.planner().plan_to(from, target);
                debug!(
                    "{:?} rotation {} -> {}: {} segment(s), {} steps",
                    priority,
                    from,
                    target,
                    plan.len(),
                    plan.total_steps()
                );

                let mut observer = coordinator.observer(target);
                let outcome = motor.execute(&plan, &mut observer).await;
                coordinator.rotation_finished(outcome);
            }
            MotionRequest::Jog(direction) => {
                jog(coordinator, motor, direction).await;
                coordinator.finish_job();
            }
        }
    }
}

async fn jog<P: PulseOutput, D: DelayNs>(
    coordinator: &Coordinator,
    motor: &mut MotorDriver<P, D>,
    direction: Direction,
) {
    let mut at = coordinator.current_position();
    info!("Jogging {:?} from slot {}", direction, at);

    let mut units = 0u32;
    while !coordinator.cancel_requested() {
        at = motor.jog_step(at, direction).await;
        coordinator.publish_position(at);
        units += 1;
    }

    info!("Jog stopped at slot {} after {} unit(s)", at, units);
}
