//! Enemy queue processor.
//!
//! Each enemy phase owns one [`EnemyQueue`]. When the phase starts the queue is
//! filled with the living enemies in roster order and the number of units to
//! process is snapshotted. Every tick at most one unit is taken off the queue.
//!
//! The `active` flag doubles as "ready for the next unit": it drops while a
//! unit's action is still being presented and comes back up when the host
//! reports completion. A unit is never dequeued while the flag is down, so
//! units act strictly one at a time.

use std::collections::VecDeque;

use crate::host::ActionStatus;
use crate::units::UnitId;

/// What the queue wants the session to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStep {
    /// Not armed, or waiting for an action to finish.
    Idle,
    /// Perform this unit's action, then call [`EnemyQueue::settle`].
    Act(UnitId),
    /// Every unit has been processed; the queue has reset itself.
    Completed,
}

/// Work queue for one enemy phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnemyQueue {
    pending: VecDeque<UnitId>,
    processed: usize,
    target: usize,
    active: bool,
    awaiting: bool,
}

impl EnemyQueue {
    /// Create an idle queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a phase: refill from `living` when empty and raise the active flag.
    ///
    /// The target count is the number of units at refill time, so enemies that
    /// die mid-phase can never push the processor past the queue.
    pub fn arm(&mut self, living: &[UnitId]) {
        if self.pending.is_empty() {
            self.pending.extend(living.iter().copied());
            self.target = self.pending.len();
            self.processed = 0;
        }
        self.active = true;
        self.awaiting = false;
    }

    /// Advance by at most one unit.
    pub fn step(&mut self) -> QueueStep {
        if !self.active {
            return QueueStep::Idle;
        }

        if self.processed >= self.target {
            self.clear();
            return QueueStep::Completed;
        }

        let Some(unit) = self.pending.pop_front() else {
            self.clear();
            return QueueStep::Completed;
        };

        self.processed += 1;
        self.active = false;
        self.awaiting = true;
        QueueStep::Act(unit)
    }

    /// Record the result of the action returned by [`step`](Self::step).
    pub fn settle(&mut self, status: ActionStatus) {
        if !self.awaiting {
            return;
        }
        match status {
            ActionStatus::Done => {
                self.awaiting = false;
                self.active = true;
            }
            ActionStatus::InProgress => {}
        }
    }

    /// Finish the phase as soon as the last unit has settled.
    ///
    /// Lets a phase whose actions all complete synchronously end on the tick
    /// that processed its last unit instead of one tick later.
    pub fn try_complete(&mut self) -> bool {
        if self.active && self.processed >= self.target {
            self.clear();
            true
        } else {
            false
        }
    }

    /// The host finished presenting an in-progress action.
    ///
    /// Returns `false` when nothing was waiting.
    pub fn resume(&mut self) -> bool {
        if !self.awaiting {
            return false;
        }
        self.awaiting = false;
        self.active = true;
        true
    }

    /// Drop all queued units and progress, e.g. when the battle is decided.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processed = 0;
        self.target = 0;
        self.active = false;
        self.awaiting = false;
    }

    /// Units dequeued so far this phase.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.processed
    }

    /// Units this phase will process.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Whether the next tick may dequeue a unit.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether an action is still being presented.
    #[must_use]
    pub const fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Units still queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
