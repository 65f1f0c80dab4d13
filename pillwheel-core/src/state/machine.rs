//! Alarm lifecycle
//!
//! Armed → Firing → Armed, with no terminal state. The engine owns the only
//! "alarm active" fact and at most one session. It is pure: every transition
//! returns the effects the runtime must apply (rotate, alert, flash, snooze)
//! instead of performing them.

use super::events::{Acknowledge, AlarmEvent, AlarmTrigger, Effect, Effects};
use crate::error::Error;
use crate::motion::Slot;

/// The one alarm in progress
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmSession {
    /// Trigger that opened the session
    pub trigger: AlarmTrigger,
    /// Carousel position when the alarm interrupted
    pub armed_slot_before_interrupt: Slot,
}

impl AlarmSession {
    /// Compartment the alarm rotates to
    pub fn slot(&self) -> Slot {
        self.trigger.slot()
    }
}

/// Alarm states
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    /// Waiting for a trigger
    #[default]
    Armed,
    /// Alert active until acknowledged
    Firing(AlarmSession),
}

impl AlarmState {
    pub fn is_firing(&self) -> bool {
        matches!(self, AlarmState::Firing(_))
    }
}

/// Alarm state machine
#[derive(Debug, Clone, Default)]
pub struct AlarmEngine {
    state: AlarmState,
    coalesced: u32,
}

impl AlarmEngine {
    pub const fn new() -> Self {
        Self {
            state: AlarmState::Armed,
            coalesced: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> &AlarmState {
        &self.state
    }

    pub fn is_firing(&self) -> bool {
        self.state.is_firing()
    }

    /// Active session, if firing
    pub fn session(&self) -> Option<&AlarmSession> {
        match &self.state {
            AlarmState::Armed => None,
            AlarmState::Firing(session) => Some(session),
        }
    }

    /// Triggers dropped because an alarm was already firing
    pub fn coalesced_count(&self) -> u32 {
        self.coalesced
    }

    /// Dispatch any alarm event
    pub fn handle(&mut self, event: AlarmEvent, current: Slot) -> Result<Effects, Error> {
        match event {
            AlarmEvent::Trigger(trigger) => self.trigger(trigger, current),
            AlarmEvent::Acknowledge(ack) => self.acknowledge(ack),
        }
    }

    /// Fire an alarm
    ///
    /// While already firing the trigger is coalesced: no second session and
    /// no effects, reported as `AlreadyFiring`.
    pub fn trigger(&mut self, trigger: AlarmTrigger, current: Slot) -> Result<Effects, Error> {
        if self.is_firing() {
            self.coalesced = self.coalesced.saturating_add(1);
            return Err(Error::AlreadyFiring);
        }

        let session = AlarmSession {
            trigger,
            armed_slot_before_interrupt: current,
        };

        let mut effects = Effects::new();
        let _ = effects.push(Effect::Rotate(session.slot()));
        let _ = effects.push(Effect::AlertOn);
        let _ = effects.push(Effect::StartFlash);

        self.state = AlarmState::Firing(session);
        Ok(effects)
    }

    /// Dismiss the firing alarm
    ///
    /// The carousel stays at the alarm slot. Snooze additionally schedules
    /// exactly one re-delivery of the same trigger.
    pub fn acknowledge(&mut self, ack: Acknowledge) -> Result<Effects, Error> {
        let session = match core::mem::take(&mut self.state) {
            AlarmState::Firing(session) => session,
            AlarmState::Armed => return Err(Error::NotFiring),
        };

        let mut effects = Effects::new();
        let _ = effects.push(Effect::StopFlash);
        let _ = effects.push(Effect::AlertOff);

        if let Acknowledge::Snooze { minutes } = ack {
            let _ = effects.push(Effect::ScheduleSnooze {
                trigger: session.trigger,
                minutes,
            });
        }

        Ok(effects)
    }

    /// Motion-sensor edge; honored only while firing
    pub fn motion_detected(&mut self) -> Result<Effects, Error> {
        self.acknowledge(Acknowledge::Motion)
    }
}
