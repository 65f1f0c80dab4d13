//! Main controller tying the alarm engine to the motor coordinator
//!
//! The controller is the surface every producer calls into:
//! - Time-of-day triggers and snooze re-delivery
//! - Manual slot picks, reset and jog
//! - Stop/snooze buttons and the motion sensor
//! - Maintenance LED/audio tests
//!
//! Alarm state, the alert output and the snooze queue sit behind one
//! critical section so a transition and the alert lines it switches are
//! never observed half-applied by the flash task.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;
use log::{debug, info, trace, warn};

use pillwheel_core::config::AlarmTiming;
use pillwheel_core::motion::{DayOfWeek, Period, Slot};
use pillwheel_core::scheduler::{SnoozeQueue, MAX_SNOOZES};
use pillwheel_core::state::{Acknowledge, AlarmEngine, AlarmTrigger, Effect, Effects};
use pillwheel_core::traits::{AlertOutput, Direction};
use pillwheel_core::Error;

use crate::coordinator::{Coordinator, Motion, Priority};

/// Command for the flash task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCommand {
    Start,
    Stop,
}

/// Snapshot for the display consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub slot: Slot,
    pub alarm_active: bool,
    pub motion: Motion,
}

struct AlarmCell<A> {
    engine: AlarmEngine,
    alert: A,
    snoozes: SnoozeQueue,
}

/// Milliseconds on the embassy monotonic clock
pub fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Carousel controller
pub struct Controller<A> {
    coordinator: Coordinator,
    alarm: Mutex<CriticalSectionRawMutex, RefCell<AlarmCell<A>>>,
    flash: Signal<CriticalSectionRawMutex, FlashCommand>,
    timing: AlarmTiming,
}

impl<A: AlertOutput> Controller<A> {
    /// Create a controller; the alert output is switched off
    pub fn new(coordinator: Coordinator, mut alert: A, timing: AlarmTiming) -> Self {
        alert.set_alert(false);
        Self {
            coordinator,
            alarm: Mutex::new(RefCell::new(AlarmCell {
                engine: AlarmEngine::new(),
                alert,
                snoozes: SnoozeQueue::new(),
            })),
            flash: Signal::new(),
            timing,
        }
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn timing(&self) -> &AlarmTiming {
        &self.timing
    }

    /// Carousel position snapshot
    pub fn current_slot(&self) -> Slot {
        self.coordinator.current_position()
    }

    /// True while an alarm session is firing
    pub fn alarm_active(&self) -> bool {
        self.alarm.lock(|cell| cell.borrow().engine.is_firing())
    }

    /// Display snapshot
    pub fn status(&self) -> Status {
        Status {
            slot: self.current_slot(),
            alarm_active: self.alarm_active(),
            motion: self.coordinator.motion(),
        }
    }

    /// Resolved time-of-day trigger from the calendar
    pub fn trigger_event(&self, day: DayOfWeek, period: Period, label: &str) -> Result<(), Error> {
        self.trigger_at(AlarmTrigger::new(day, period, label), now_ms())
    }

    /// Deliver a trigger at an explicit clock time
    pub fn trigger_at(&self, trigger: AlarmTrigger, now_ms: u64) -> Result<(), Error> {
        let current = self.current_slot();
        let slot = trigger.slot();

        let result = self
            .alarm
            .lock(|cell| cell.borrow_mut().engine.trigger(trigger, current));

        match result {
            Ok(effects) => {
                info!("Alarm firing for slot {} (carousel at {})", slot, current);
                self.apply(effects, now_ms);
                Ok(())
            }
            Err(Error::AlreadyFiring) => {
                let coalesced = self.alarm.lock(|cell| cell.borrow().engine.coalesced_count());
                warn!(
                    "Trigger for slot {} dropped: {} ({} coalesced so far)",
                    slot,
                    Error::AlreadyFiring,
                    coalesced
                );
                Err(Error::AlreadyFiring)
            }
            Err(e) => Err(e),
        }
    }

    /// Operator slot pick
    pub fn request_manual_rotation(&self, slot: u8) -> Result<(), Error> {
        self.coordinator.request_rotation(slot, Priority::Manual)
    }

    /// Rotate back to slot 0
    pub fn reset(&self) -> Result<(), Error> {
        self.coordinator.reset()
    }

    /// Press (`active`) or release a jog button
    pub fn request_jog(&self, direction: Direction, active: bool) -> Result<(), Error> {
        if !active {
            self.coordinator.stop_jog();
            return Ok(());
        }

        if self.alarm_active() {
            warn!("{}: alarm rotation yields to jog", Error::JogWhileFiring);
        }
        self.coordinator.start_jog(direction)
    }

    /// Stop button
    pub fn stop(&self) -> Result<(), Error> {
        self.acknowledge_at(Acknowledge::Stop, now_ms())
    }

    /// Snooze button; `None` uses the configured delay
    pub fn snooze(&self, minutes: Option<u16>) -> Result<(), Error> {
        let minutes = minutes.unwrap_or(self.timing.snooze_minutes);
        self.acknowledge_at(Acknowledge::Snooze { minutes }, now_ms())
    }

    /// Motion sensor edge; ignored unless firing
    pub fn motion_detected(&self) -> Result<(), Error> {
        self.acknowledge_at(Acknowledge::Motion, now_ms())
    }

    /// Dismiss the firing alarm at an explicit clock time
    pub fn acknowledge_at(&self, ack: Acknowledge, now_ms: u64) -> Result<(), Error> {
        let effects = self
            .alarm
            .lock(|cell| cell.borrow_mut().engine.acknowledge(ack))?;

        info!("Alarm acknowledged ({:?}), re-armed", ack);
        self.apply(effects, now_ms);
        Ok(())
    }

    /// Maintenance LED test; refused while an alarm owns the LED
    pub fn test_led(&self, on: bool) -> Result<(), Error> {
        self.with_idle_alert(|alert| alert.set_led(on))?;
        info!("LED test: {}", if on { "on" } else { "off" });
        Ok(())
    }

    /// Maintenance audio test; refused while an alarm owns the buzzer
    pub fn test_audio(&self, on: bool) -> Result<(), Error> {
        self.with_idle_alert(|alert| alert.set_audio(on))?;
        info!("Audio test: {}", if on { "on" } else { "off" });
        Ok(())
    }

    /// Re-deliver every snooze due at `now_ms`
    ///
    /// Returns how many opened an alarm session; coalesced ones are not
    /// counted.
    pub fn poll_snoozes(&self, now_ms: u64) -> usize {
        let mut delivered = 0;
        while let Some(trigger) = self
            .alarm
            .lock(|cell| cell.borrow_mut().snoozes.pop_due(now_ms))
        {
            info!(
                "Snooze due: {} {} \"{}\"",
                trigger.day, trigger.period, trigger.label
            );
            // A re-delivery into a firing alarm is coalesced like any trigger
            if self.trigger_at(trigger, now_ms).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Snoozes waiting for re-delivery as `(due_ms, trigger)`
    pub fn pending_snoozes(&self) -> heapless::Vec<(u64, AlarmTrigger), MAX_SNOOZES> {
        self.alarm.lock(|cell| {
            cell.borrow()
                .snoozes
                .entries()
                .iter()
                .map(|e| (e.due_ms, e.trigger.clone()))
                .collect()
        })
    }

    /// Wait for the next flash command
    pub async fn flash_command(&self) -> FlashCommand {
        self.flash.wait().await
    }

    /// Drive the LED for one flash phase
    ///
    /// Returns false (and leaves the LED alone) once the alarm is no longer
    /// firing.
    pub fn flash_led(&self, on: bool) -> bool {
        self.alarm.lock(|cell| {
            let mut cell = cell.borrow_mut();
            if !cell.engine.is_firing() {
                return false;
            }
            cell.alert.set_led(on);
            true
        })
    }

    /// Inspect the alert output
    pub fn with_alert<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        self.alarm.lock(|cell| f(&cell.borrow().alert))
    }

    fn with_idle_alert(&self, f: impl FnOnce(&mut A)) -> Result<(), Error> {
        self.alarm.lock(|cell| {
            let mut cell = cell.borrow_mut();
            if cell.engine.is_firing() {
                return Err(Error::AlreadyFiring);
            }
            f(&mut cell.alert);
            Ok(())
        })
    }

    fn apply(&self, effects: Effects, now_ms: u64) {
        for effect in effects {
            trace!("Applying {:?}", effect);
            match effect {
                Effect::Rotate(slot) => {
                    if let Err(e) = self.coordinator.rotate_to(slot, Priority::Alarm) {
                        warn!("Alarm rotation to slot {} not queued: {}", slot, e);
                    }
                }
                Effect::AlertOn => self.set_alert(true),
                Effect::AlertOff => self.set_alert(false),
                Effect::StartFlash => self.flash.signal(FlashCommand::Start),
                Effect::StopFlash => self.flash.signal(FlashCommand::Stop),
                Effect::ScheduleSnooze { trigger, minutes } => {
                    let result = self
                        .alarm
                        .lock(|cell| cell.borrow_mut().snoozes.schedule(trigger, now_ms, minutes));
                    match result {
                        Ok(due_ms) => debug!("Snoozed {} min (due at {} ms)", minutes, due_ms),
                        Err(dropped) => warn!(
                            "Snooze queue full, dropping re-delivery of \"{}\"",
                            dropped.label
                        ),
                    }
                }
            }
        }
        self.coordinator.notify();
    }

    fn set_alert(&self, on: bool) {
        self.alarm.lock(|cell| cell.borrow_mut().alert.set_alert(on));
    }
}
