//! Motor coordinator
//!
//! Serializes the three producers of motion (alarm rotation, manual slot
//! pick, jog) onto the one motor. Producers only ever touch the queued
//! request and the cancel flag under a short critical section; the motor
//! task is the single writer of the carousel position and holds no lock
//! while pulses are being timed.
//!
//! Arbitration:
//!
//! | incoming vs. active      | effect                                        |
//! |--------------------------|-----------------------------------------------|
//! | priority >= active       | cancel active at next boundary, queue request |
//! | priority < active        | queue request, run when active finishes       |
//! | pending has higher prio  | reject with `MotorBusy`                       |
//!
//! An alarm rotation that meets a jog (running or queued) is parked as the
//! deferred alarm target instead. Jog requests never displace it and it runs
//! as soon as the jog is released.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use log::{debug, info, warn};

use pillwheel_core::motion::{Excursion, JogState, RotationPlanner, Slot};
use pillwheel_core::traits::Direction;
use pillwheel_core::Error;
use pillwheel_drivers::stepper::{ExecutionOutcome, SegmentObserver};

/// Producer priority, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    /// Operator slot pick, reset and excursion restore
    Manual,
    /// Rotation to a firing alarm's compartment
    Alarm,
    /// Maintenance jog
    Jog,
}

/// A unit of work for the motor task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionRequest {
    Rotate { target: Slot, priority: Priority },
    Jog(Direction),
}

impl MotionRequest {
    pub fn priority(&self) -> Priority {
        match self {
            MotionRequest::Rotate { priority, .. } => *priority,
            MotionRequest::Jog(_) => Priority::Jog,
        }
    }
}

/// What the motor is doing, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    #[default]
    Idle,
    Rotating {
        target: Slot,
        completed: usize,
        total: usize,
    },
    Jogging(Direction),
}

struct MotorState {
    active: Option<Priority>,
    pending: Option<MotionRequest>,
    deferred_alarm: Option<Slot>,
    cancel: bool,
    jog: JogState,
    excursion: Excursion,
    motion: Motion,
}

/// Owner of carousel position and motor access
pub struct Coordinator {
    planner: RotationPlanner,
    position: AtomicU8,
    state: Mutex<CriticalSectionRawMutex, RefCell<MotorState>>,
    wake: Signal<CriticalSectionRawMutex, ()>,
    changed: Signal<CriticalSectionRawMutex, ()>,
}

impl Coordinator {
    /// Create a coordinator with the carousel assumed at slot 0
    pub fn new(planner: RotationPlanner) -> Self {
        Self::with_position(planner, Slot::HOME)
    }

    /// Create a coordinator with a known starting position
    pub fn with_position(planner: RotationPlanner, position: Slot) -> Self {
        Self {
            planner,
            position: AtomicU8::new(position.index()),
            state: Mutex::new(RefCell::new(MotorState {
                active: None,
                pending: None,
                deferred_alarm: None,
                cancel: false,
                jog: JogState::Idle,
                excursion: Excursion::new(),
                motion: Motion::Idle,
            })),
            wake: Signal::new(),
            changed: Signal::new(),
        }
    }

    /// Lock-free position snapshot
    pub fn current_position(&self) -> Slot {
        // Only the motor task stores, and only valid slot indices.
        Slot::new(self.position.load(Ordering::Acquire)).unwrap_or(Slot::HOME)
    }

    /// Current motion, for display
    pub fn motion(&self) -> Motion {
        self.state.lock(|s| s.borrow().motion)
    }

    /// True when nothing is running or queued
    pub fn is_idle(&self) -> bool {
        self.state
            .lock(|s| {
                let s = s.borrow();
                s.active.is_none() && s.pending.is_none() && s.deferred_alarm.is_none()
            })
    }

    /// Request a rotation to a raw slot index
    ///
    /// An invalid index is rejected before anything is touched.
    pub fn request_rotation(&self, target: u8, priority: Priority) -> Result<(), Error> {
        let target = Slot::new(target)?;
        self.rotate_to(target, priority)
    }

    /// Request a rotation to a validated slot
    pub fn rotate_to(&self, target: Slot, priority: Priority) -> Result<(), Error> {
        self.submit(MotionRequest::Rotate { target, priority })
    }

    /// Rotate back to slot 0
    pub fn reset(&self) -> Result<(), Error> {
        info!("Reset requested");
        self.rotate_to(Slot::HOME, Priority::Manual)
    }

    /// Start jogging, pre-empting any planned rotation at its next boundary
    ///
    /// Pressing the button already held is a no-op.
    pub fn start_jog(&self, direction: Direction) -> Result<(), Error> {
        let already = self
            .state
            .lock(|s| s.borrow().jog == JogState::Jogging(direction));
        if already {
            return Ok(());
        }

        self.submit(MotionRequest::Jog(direction))?;
        self.state.lock(|s| s.borrow_mut().jog.start(direction));
        Ok(())
    }

    /// Release the jog. Always legal; a no-op when not jogging.
    pub fn stop_jog(&self) {
        let stopped = self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let mut stopped = s.jog.stop();
            if matches!(s.pending, Some(MotionRequest::Jog(_))) {
                s.pending = None;
                stopped = true;
            }
            if s.active == Some(Priority::Jog) {
                s.cancel = true;
                stopped = true;
            }
            stopped
        });

        if stopped {
            debug!("Jog released");
            self.wake.signal(());
        }
    }

    /// Remember the current slot for a later restore
    pub fn begin_excursion(&self) -> bool {
        let at = self.current_position();
        let opened = self.state.lock(|s| s.borrow_mut().excursion.begin(at));
        if opened {
            info!("Maintenance excursion from slot {}", at);
        }
        opened
    }

    /// Close the excursion, rotating back if the carousel moved
    ///
    /// Returns the restore target when a rotation was requested. An open jog
    /// is released first. A jog unit still in flight can move the carousel
    /// after the release, so while a jog is running the restore is queued
    /// behind it unconditionally; the motor task plans from wherever the jog
    /// stopped, which is an empty plan if that is the origin.
    pub fn end_excursion(&self) -> Result<Option<Slot>, Error> {
        let jog_running = self.state.lock(|s| {
            let s = s.borrow();
            s.active == Some(Priority::Jog) || matches!(s.pending, Some(MotionRequest::Jog(_)))
        });
        self.stop_jog();

        let at = self.current_position();
        let restore = self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let origin = s.excursion.origin();
            let moved = s.excursion.end(at);
            if jog_running {
                origin
            } else {
                moved
            }
        });

        match restore {
            Some(origin) => {
                info!("Excursion ended at slot {}, restoring slot {}", at, origin);
                self.rotate_to(origin, Priority::Manual)?;
                Ok(Some(origin))
            }
            None => {
                debug!("Excursion ended, nothing to restore");
                Ok(None)
            }
        }
    }

    fn submit(&self, request: MotionRequest) -> Result<(), Error> {
        let priority = request.priority();

        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let jog_pending = matches!(s.pending, Some(MotionRequest::Jog(_)));

            if let MotionRequest::Rotate {
                target,
                priority: Priority::Alarm,
            } = request
            {
                if s.active == Some(Priority::Jog) || jog_pending {
                    debug!("Alarm rotation to slot {} deferred until jog release", target);
                    if !jog_pending {
                        // Replaces a queued manual pick, as it would without the jog
                        s.pending = None;
                    }
                    s.deferred_alarm = Some(target);
                    return Ok(());
                }
                s.deferred_alarm = None;
            }

            let waiting = s
                .pending
                .map(|pending| pending.priority())
                .or(s.deferred_alarm.map(|_| Priority::Alarm));
            if let Some(waiting) = waiting {
                if waiting > priority {
                    warn!(
                        "Rejecting {:?}: {:?} request already queued ({})",
                        request,
                        waiting,
                        Error::MotorBusy
                    );
                    return Err(Error::MotorBusy);
                }
            }

            if let (
                MotionRequest::Jog(_),
                Some(MotionRequest::Rotate {
                    target,
                    priority: Priority::Alarm,
                }),
            ) = (request, s.pending)
            {
                debug!("Alarm rotation to slot {} deferred until jog release", target);
                s.deferred_alarm = Some(target);
            }

            if let Some(active) = s.active {
                if priority >= active {
                    debug!("{:?} pre-empts active {:?} job", request, active);
                    s.cancel = true;
                } else {
                    debug!("{:?} queued behind active {:?} job", request, active);
                }
            }

            s.pending = Some(request);
            Ok(())
        })?;

        self.wake.signal(());
        Ok(())
    }

    /// Wait for the next request and mark it active
    pub async fn next_job(&self) -> MotionRequest {
        loop {
            let job = self.state.lock(|s| {
                let mut s = s.borrow_mut();
                let job = s.pending.take().or_else(|| {
                    s.deferred_alarm.take().map(|target| MotionRequest::Rotate {
                        target,
                        priority: Priority::Alarm,
                    })
                })?;
                s.active = Some(job.priority());
                s.cancel = false;
                s.motion = match job {
                    MotionRequest::Rotate { target, .. } => Motion::Rotating {
                        target,
                        completed: 0,
                        total: self.current_position().distance_to(target) as usize,
                    },
                    MotionRequest::Jog(direction) => Motion::Jogging(direction),
                };
                Some(job)
            });

            if let Some(job) = job {
                self.changed.signal(());
                return job;
            }

            self.wake.wait().await;
        }
    }

    /// True once the active job should stop at its next boundary
    pub fn cancel_requested(&self) -> bool {
        self.state.lock(|s| s.borrow().cancel)
    }

    /// Publish a boundary reached by the motor task
    pub fn publish_position(&self, slot: Slot) {
        self.position.store(slot.index(), Ordering::Release);
        self.changed.signal(());
    }

    /// Mark the active job finished
    pub fn finish_job(&self) {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.active = None;
            s.cancel = false;
            s.motion = Motion::Idle;
        });
        self.changed.signal(());
    }

    /// Planner used for rotation jobs
    pub fn planner(&self) -> &RotationPlanner {
        &self.planner
    }

    /// Observer that publishes progress of a rotation towards `target`
    pub fn observer(&self, target: Slot) -> RotationProgress<'_> {
        RotationProgress {
            coordinator: self,
            target,
        }
    }

    /// Record the outcome of a rotation job
    pub fn rotation_finished(&self, outcome: ExecutionOutcome) {
        match outcome {
            ExecutionOutcome::Completed(slot) => info!("Rotation complete at slot {}", slot),
            ExecutionOutcome::Cancelled { at, completed } => {
                info!(
                    "Rotation cancelled at slot {} after {} segment(s)",
                    at, completed
                )
            }
        }
        self.finish_job();
    }

    /// Wake anyone waiting for a status change
    pub fn notify(&self) {
        self.changed.signal(());
    }

    /// Wait until position, motion or alarm state may have changed
    pub async fn changed(&self) {
        self.changed.wait().await
    }
}

/// Segment observer bound to the coordinator
pub struct RotationProgress<'a> {
    coordinator: &'a Coordinator,
    target: Slot,
}

impl SegmentObserver for RotationProgress<'_> {
    fn cancel_requested(&mut self) -> bool {
        self.coordinator.cancel_requested()
    }

    fn segment_completed(&mut self, reached: Slot, completed: usize, total: usize) {
        let target = self.target;
        self.coordinator.state.lock(|s| {
            s.borrow_mut().motion = Motion::Rotating {
                target,
                completed,
                total,
            }
        });
        self.coordinator.publish_position(reached);
    }
}
