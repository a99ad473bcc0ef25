//! Virtual-time clock scheduler
//!
//! Single-threaded: every clock shares one logical timeline, and firings are
//! handed out one at a time in deadline order. While a clock fires, `now()`
//! equals its deadline, so a re-arm from inside the callback is measured from
//! the firing time rather than from wherever the host wants to advance to.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use armonizador_core::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockId(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: f64,
    /// Arming order, breaks ties between equal deadlines
    seq: u64,
}

#[derive(Debug, Default)]
struct Timeline {
    now: f64,
    next_id: u64,
    next_seq: u64,
    pending: HashMap<ClockId, Pending>,
}

impl Timeline {
    fn arm(&mut self, id: ClockId, ms: f64) {
        let deadline = self.now + ms.max(0.0);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(id, Pending { deadline, seq });
    }
}

/// Shared logical clock source for one runtime
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    timeline: Rc<RefCell<Timeline>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in milliseconds
    pub fn now(&self) -> f64 {
        self.timeline.borrow().now
    }

    /// Create an unarmed clock on this timeline
    pub fn clock(&self) -> SchedulerClock {
        let mut timeline = self.timeline.borrow_mut();
        let id = ClockId(timeline.next_id);
        timeline.next_id += 1;
        SchedulerClock { id, timeline: self.timeline.clone() }
    }

    pub fn deadline(&self, id: ClockId) -> Option<f64> {
        self.timeline.borrow().pending.get(&id).map(|p| p.deadline)
    }

    pub fn is_armed(&self, id: ClockId) -> bool {
        self.timeline.borrow().pending.contains_key(&id)
    }

    /// Disarm and return the earliest clock due at or before `until`,
    /// moving logical time to its deadline
    pub fn pop_due(&self, until: f64) -> Option<ClockId> {
        let mut timeline = self.timeline.borrow_mut();
        let (&id, &due) = timeline
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= until)
            .min_by(|(_, a), (_, b)| a.deadline.total_cmp(&b.deadline).then(a.seq.cmp(&b.seq)))?;
        timeline.pending.remove(&id);
        timeline.now = timeline.now.max(due.deadline);
        Some(id)
    }

    /// Move logical time forward to `time`; never moves backwards
    pub fn advance_to(&self, time: f64) {
        let mut timeline = self.timeline.borrow_mut();
        timeline.now = timeline.now.max(time);
    }
}

/// A [`Clock`] handle on a [`Scheduler`] timeline.
///
/// Dropping the handle does not disarm it; the owner calls
/// [`Clock::unset`] on teardown.
#[derive(Debug)]
pub struct SchedulerClock {
    id: ClockId,
    timeline: Rc<RefCell<Timeline>>,
}

impl SchedulerClock {
    pub fn id(&self) -> ClockId {
        self.id
    }
}

impl Clock for SchedulerClock {
    fn delay(&mut self, ms: f64) {
        self.timeline.borrow_mut().arm(self.id, ms);
    }

    fn unset(&mut self) {
        self.timeline.borrow_mut().pending.remove(&self.id);
    }
}
