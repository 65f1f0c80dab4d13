//! Motor executor
//!
//! Turns a [`RotationPlan`] into timed step pulses. Cancellation is checked
//! between segments only and position is reported after each completed
//! segment, so the carousel is never left between compartments.
//!
//! The executor owns no shared state. The caller passes a
//! [`SegmentObserver`] that answers "should I stop?" at every boundary and
//! receives the newly reached slot.

use embedded_hal_async::delay::DelayNs;
use pillwheel_core::config::MotorTiming;
use pillwheel_core::motion::{jog_unit, RotationPlan, Slot};
use pillwheel_core::traits::{Direction, PulseOutput};

/// High and low time of one step pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTiming {
    pub high_us: u32,
    pub low_us: u32,
}

impl PulseTiming {
    /// Timing for planned rotation
    pub fn rotation(timing: &MotorTiming) -> Self {
        Self {
            high_us: timing.step_high_us,
            low_us: timing.step_low_us,
        }
    }

    /// Timing for jog pulses
    pub fn jog(timing: &MotorTiming) -> Self {
        Self {
            high_us: timing.jog_high_us,
            low_us: timing.jog_low_us,
        }
    }
}

/// Segment-boundary hooks
pub trait SegmentObserver {
    /// Checked before each segment starts
    fn cancel_requested(&mut self) -> bool;

    /// Called after each segment with the slot it reached
    fn segment_completed(&mut self, reached: Slot, completed: usize, total: usize);
}

/// Observer that never cancels and ignores progress
impl SegmentObserver for () {
    fn cancel_requested(&mut self) -> bool {
        false
    }

    fn segment_completed(&mut self, _reached: Slot, _completed: usize, _total: usize) {}
}

/// How a plan execution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExecutionOutcome {
    /// Every segment ran; carousel at the plan target
    Completed(Slot),
    /// Stopped at a boundary after `completed` segments
    Cancelled { at: Slot, completed: usize },
}

impl ExecutionOutcome {
    /// Slot the carousel is on
    pub fn slot(&self) -> Slot {
        match self {
            ExecutionOutcome::Completed(slot) => *slot,
            ExecutionOutcome::Cancelled { at, .. } => *at,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutionOutcome::Cancelled { .. })
    }
}

/// Async stepper executor
pub struct MotorDriver<P, D> {
    output: P,
    delay: D,
    timing: MotorTiming,
}

impl<P: PulseOutput, D: DelayNs> MotorDriver<P, D> {
    /// Create an executor over `output`, timed by `delay`
    pub fn new(output: P, delay: D, timing: MotorTiming) -> Self {
        Self {
            output,
            delay,
            timing,
        }
    }

    /// Configured timing
    pub fn timing(&self) -> &MotorTiming {
        &self.timing
    }

    /// Access the underlying output
    pub fn output(&self) -> &P {
        &self.output
    }

    /// Emit one step pulse
    pub async fn pulse(&mut self, timing: PulseTiming) {
        self.output.set_step(true);
        self.delay.delay_us(timing.high_us).await;
        self.output.set_step(false);
        self.delay.delay_us(timing.low_us).await;
    }

    /// Run `plan`, stopping at the first boundary where `observer` asks to
    ///
    /// An empty plan returns immediately without touching the output.
    pub async fn execute<O: SegmentObserver>(
        &mut self,
        plan: &RotationPlan,
        observer: &mut O,
    ) -> ExecutionOutcome {
        let pulse = PulseTiming::rotation(&self.timing);
        let total = plan.len();
        let mut at = plan.origin();

        for (index, segment) in plan.segments().iter().enumerate() {
            if observer.cancel_requested() {
                return ExecutionOutcome::Cancelled {
                    at,
                    completed: index,
                };
            }

            self.output.set_direction(segment.direction);
            for _ in 0..segment.steps {
                self.pulse(pulse).await;
            }

            at = segment.end();
            observer.segment_completed(at, index + 1, total);
        }

        ExecutionOutcome::Completed(at)
    }

    /// One jog unit: a single pulse that moves the tracked position by one slot
    pub async fn jog_step(&mut self, from: Slot, direction: Direction) -> Slot {
        self.output.set_direction(direction);
        self.pulse(PulseTiming::jog(&self.timing)).await;
        jog_unit(from, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPulseOutput;
    use crate::testing::MockDelay;
    use embassy_futures::block_on;
    use pillwheel_core::config::DEFAULT_STEP_TABLE;
    use pillwheel_core::motion::RotationPlanner;

    fn slot(index: u8) -> Slot {
        Slot::new(index).unwrap()
    }

    /// Records progress and cancels once `cancel_after` segments are done
    struct Recorder {
        cancel_after: Option<usize>,
        reached: [Option<Slot>; 14],
        completed: usize,
    }

    impl Recorder {
        fn new(cancel_after: Option<usize>) -> Self {
            Self {
                cancel_after,
                reached: [None; 14],
                completed: 0,
            }
        }
    }

    impl SegmentObserver for Recorder {
        fn cancel_requested(&mut self) -> bool {
            self.cancel_after == Some(self.completed)
        }

        fn segment_completed(&mut self, reached: Slot, completed: usize, _total: usize) {
            self.reached[completed - 1] = Some(reached);
            self.completed = completed;
        }
    }

    fn driver() -> MotorDriver<SimPulseOutput, MockDelay> {
        MotorDriver::new(SimPulseOutput::new(), MockDelay::default(), MotorTiming::default())
    }

    #[test]
    fn test_full_plan_emits_table_pulses() {
        let mut motor = driver();
        let plan = RotationPlanner::default().plan(Slot::HOME, 6).unwrap();
        let mut recorder = Recorder::new(None);

        let outcome = block_on(motor.execute(&plan, &mut recorder));

        assert_eq!(outcome, ExecutionOutcome::Completed(slot(6)));
        let expected: u32 = DEFAULT_STEP_TABLE[0..6].iter().map(|&s| s as u32).sum();
        assert_eq!(motor.output().pulses(), (expected, 0));
        for i in 0..6 {
            assert_eq!(recorder.reached[i], Some(slot(i as u8 + 1)));
        }
    }

    #[test]
    fn test_pulse_timing_respected() {
        let mut motor = driver();
        let plan = RotationPlanner::default().plan(Slot::HOME, 1).unwrap();

        block_on(motor.execute(&plan, &mut ()));

        // 14 pulses, 2 ms high + 2 ms low each
        assert_eq!(motor.delay.total_ns, 14 * 4_000_000);
    }

    #[test]
    fn test_empty_plan_untouched() {
        let mut motor = driver();
        let plan = RotationPlanner::default().plan(slot(4), 4).unwrap();

        let outcome = block_on(motor.execute(&plan, &mut ()));

        assert_eq!(outcome, ExecutionOutcome::Completed(slot(4)));
        assert!(motor.output().untouched());
        assert_eq!(motor.delay.total_ns, 0);
    }

    #[test]
    fn test_cancel_lands_on_boundary() {
        let mut motor = driver();
        let plan = RotationPlanner::default().plan(Slot::HOME, 6).unwrap();
        let mut recorder = Recorder::new(Some(2));

        let outcome = block_on(motor.execute(&plan, &mut recorder));

        assert_eq!(
            outcome,
            ExecutionOutcome::Cancelled {
                at: slot(2),
                completed: 2
            }
        );
        let expected: u32 = DEFAULT_STEP_TABLE[0..2].iter().map(|&s| s as u32).sum();
        assert_eq!(motor.output().total_pulses(), expected);
    }

    #[test]
    fn test_cancel_before_first_segment() {
        let mut motor = driver();
        let plan = RotationPlanner::default().plan(slot(3), 5).unwrap();
        let mut recorder = Recorder::new(Some(0));

        let outcome = block_on(motor.execute(&plan, &mut recorder));

        assert_eq!(outcome.slot(), slot(3));
        assert!(outcome.is_cancelled());
        assert!(motor.output().untouched());
    }

    #[test]
    fn test_jog_step_wraps() {
        let mut motor = driver();
        let reached = block_on(motor.jog_step(Slot::HOME, Direction::Reverse));
        assert_eq!(reached, slot(13));
        assert_eq!(motor.output().pulses(), (0, 1));
    }
}
