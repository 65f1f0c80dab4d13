//! Snooze re-delivery queue
//!
//! Holds triggers that must be re-delivered at a later instant. Times are
//! plain milliseconds on whatever monotonic clock the runtime ticks with.

use heapless::Vec;

use crate::state::AlarmTrigger;

/// Maximum outstanding snoozes
pub const MAX_SNOOZES: usize = 8;

/// One queued re-delivery
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SnoozeEntry {
    /// Monotonic time the trigger becomes due (ms)
    pub due_ms: u64,
    pub trigger: AlarmTrigger,
}

/// Due-time ordered snooze queue
#[derive(Debug, Clone, Default)]
pub struct SnoozeQueue {
    entries: Vec<SnoozeEntry, MAX_SNOOZES>,
}

impl SnoozeQueue {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Queue `trigger` for `minutes` after `now_ms`
    ///
    /// A pending snooze for the same dose is replaced, so one dose never has
    /// more than one future trigger. Returns the due time, or gives the
    /// trigger back when the queue is full.
    pub fn schedule(
        &mut self,
        trigger: AlarmTrigger,
        now_ms: u64,
        minutes: u16,
    ) -> Result<u64, AlarmTrigger> {
        let due_ms = now_ms.saturating_add(minutes as u64 * 60_000);

        self.entries
            .retain(|e| !(e.trigger.day == trigger.day && e.trigger.period == trigger.period));

        self.entries
            .push(SnoozeEntry { due_ms, trigger })
            .map_err(|entry| entry.trigger)?;
        Ok(due_ms)
    }

    /// Remove and return the earliest trigger due at `now_ms`
    pub fn pop_due(&mut self, now_ms: u64) -> Option<AlarmTrigger> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by_key(|(_, e)| e.due_ms)
            .map(|(i, _)| i)?;
        Some(self.entries.swap_remove(index).trigger)
    }

    /// Next due time, if anything is queued
    pub fn next_due(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due_ms).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queued entries, unordered
    pub fn entries(&self) -> &[SnoozeEntry] {
        &self.entries
    }
}
