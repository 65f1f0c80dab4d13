//! Alarm inputs and the side effects they request

use heapless::{String, Vec};

use crate::config::MAX_LABEL_LEN;
use crate::motion::{DayOfWeek, Period, Slot};

/// Display label carried by an alarm ("08:00 AM", "With food", ...)
pub type Label = String<MAX_LABEL_LEN>;

/// Resolved time-of-day trigger
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTrigger {
    pub day: DayOfWeek,
    pub period: Period,
    pub label: Label,
}

impl AlarmTrigger {
    /// Build a trigger, truncating the label at a character boundary
    pub fn new(day: DayOfWeek, period: Period, label: &str) -> Self {
        let mut truncated = Label::new();
        for c in label.chars() {
            if truncated.push(c).is_err() {
                break;
            }
        }
        Self {
            day,
            period,
            label: truncated,
        }
    }

    /// Compartment holding this dose
    pub fn slot(&self) -> Slot {
        Slot::for_dose(self.day, self.period)
    }
}

/// How a firing alarm is dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acknowledge {
    /// Stop button
    Stop,
    /// Snooze button; re-fire after `minutes`
    Snooze { minutes: u16 },
    /// Motion sensor saw the user at the carousel
    Motion,
}

/// Everything the alarm engine reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmEvent {
    Trigger(AlarmTrigger),
    Acknowledge(Acknowledge),
}

/// Side effect requested by a transition, applied by the runtime in order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Rotate to the alarm compartment at alarm priority
    Rotate(Slot),
    /// Buzzer and LED on
    AlertOn,
    /// Buzzer and LED off
    AlertOff,
    /// Start the LED flash timer
    StartFlash,
    /// Cancel the LED flash timer
    StopFlash,
    /// Re-deliver `trigger` after `minutes`
    ScheduleSnooze { trigger: AlarmTrigger, minutes: u16 },
}

/// Maximum effects produced by one transition
pub const MAX_EFFECTS: usize = 4;

/// Ordered effects of one transition
pub type Effects = Vec<Effect, MAX_EFFECTS>;
