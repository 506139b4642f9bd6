//! Single-threaded task queue with a virtual clock.
//!
//! Three suspension primitives, mirroring a browser event loop:
//!
//! - [`TaskQueue::defer`]: run on the next tick (a zero-delay timer)
//! - [`TaskQueue::set_timeout`]: run once the clock reaches `now + delay`
//! - [`TaskQueue::request_frame`]: run on the next animation frame
//!
//! The queue stores plain task values, not closures; the owner pops tasks and
//! interprets them, which keeps every state transition synchronous with
//! respect to the queue.

use std::collections::VecDeque;

/// Handle to a queued task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

#[derive(Debug)]
struct Timer<T> {
    id: TaskId,
    due_ms: u64,
    task: T,
}

/// Deterministic task queue driven by the caller.
#[derive(Debug)]
pub struct TaskQueue<T> {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer<T>>,
    frames: VecDeque<(TaskId, T)>,
    frame_count: u64,
}

impl<T> TaskQueue<T> {
    /// Create an empty queue with the clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            timers: Vec::new(),
            frames: VecDeque::new(),
            frame_count: 0,
        }
    }

    fn allocate(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now_ms
    }

    /// Number of animation frames run so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run `task` on the next tick.
    pub fn defer(&mut self, task: T) -> TaskId {
        self.set_timeout(0, task)
    }

    /// Run `task` once `delay_ms` has elapsed.
    pub fn set_timeout(&mut self, delay_ms: u64, task: T) -> TaskId {
        let id = self.allocate();
        let due_ms = self.now_ms.saturating_add(delay_ms);
        // Keep timers sorted by (due, id) so equal deadlines run FIFO.
        let index = self.timers.partition_point(|t| t.due_ms <= due_ms);
        self.timers.insert(index, Timer { id, due_ms, task });
        id
    }

    /// Run `task` on the next animation frame.
    pub fn request_frame(&mut self, task: T) -> TaskId {
        let id = self.allocate();
        self.frames.push_back((id, task));
        id
    }

    /// Cancel a queued task. Returns `false` if it already ran or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(index) = self.timers.iter().position(|t| t.id == id) {
            self.timers.remove(index);
            return true;
        }
        if let Some(index) = self.frames.iter().position(|(fid, _)| *fid == id) {
            self.frames.remove(index);
            return true;
        }
        false
    }

    /// Cancel every queued task matching `predicate`. Returns how many were dropped.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.timers.len() + self.frames.len();
        self.timers.retain(|t| !predicate(&t.task));
        self.frames.retain(|(_, task)| !predicate(task));
        before - (self.timers.len() + self.frames.len())
    }

    /// Pop the earliest timer due at or before `deadline_ms`, moving the clock to its deadline.
    pub fn pop_due_by(&mut self, deadline_ms: u64) -> Option<(TaskId, T)> {
        if self.timers.first()?.due_ms > deadline_ms {
            return None;
        }
        let timer = self.timers.remove(0);
        self.now_ms = self.now_ms.max(timer.due_ms);
        tracing::trace!(task = timer.id.0, at = self.now_ms, "timer due");
        Some((timer.id, timer.task))
    }

    /// Move the clock forward to `now_ms` without running anything.
    pub fn settle_clock(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Take the frame callbacks queued so far; callbacks queued while running
    /// them belong to the next frame.
    pub fn take_frame(&mut self) -> Vec<(TaskId, T)> {
        self.frame_count += 1;
        self.frames.drain(..).collect()
    }

    /// Deadline of the next timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.first().map(|t| t.due_ms)
    }

    /// Number of queued timers (including deferred ticks).
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of queued frame callbacks.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty() && self.frames.is_empty()
    }

    /// Iterate over queued tasks (timers first, then frames).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.timers
            .iter()
            .map(|t| &t.task)
            .chain(self.frames.iter().map(|(_, task)| task))
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain_by<T>(queue: &mut TaskQueue<T>, deadline: u64) -> Vec<T> {
        let mut out = Vec::new();
        while let Some((_, task)) = queue.pop_due_by(deadline) {
            out.push(task);
        }
        queue.settle_clock(deadline);
        out
    }

    #[test]
    fn test_defer_runs_on_next_tick() {
        let mut queue = TaskQueue::new();
        queue.defer("a");
        assert_eq!(queue.pending_timers(), 1);
        assert_eq!(drain_by(&mut queue, 0), vec!["a"]);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_timeouts_run_in_deadline_order() {
        let mut queue = TaskQueue::new();
        queue.set_timeout(30, "late");
        queue.set_timeout(10, "early");
        queue.defer("now");

        assert_eq!(drain_by(&mut queue, 5), vec!["now"]);
        assert_eq!(queue.now(), 5);
        assert_eq!(drain_by(&mut queue, 100), vec!["early", "late"]);
        assert_eq!(queue.now(), 100);
    }

    #[test]
    fn test_equal_deadlines_are_fifo() {
        let mut queue = TaskQueue::new();
        queue.set_timeout(10, 1);
        queue.set_timeout(10, 2);
        queue.set_timeout(10, 3);
        assert_eq!(drain_by(&mut queue, 10), vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel() {
        let mut queue = TaskQueue::new();
        let a = queue.set_timeout(10, "a");
        let f = queue.request_frame("f");
        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert!(queue.cancel(f));
        assert!(queue.is_idle());
    }

    #[test]
    fn test_cancel_where() {
        let mut queue = TaskQueue::new();
        queue.defer(1);
        queue.set_timeout(5, 2);
        queue.request_frame(1);
        assert_eq!(queue.cancel_where(|t| *t == 1), 2);
        assert_eq!(drain_by(&mut queue, 10), vec![2]);
    }

    #[test]
    fn test_frames_requested_during_frame_run_next_frame() {
        let mut queue = TaskQueue::new();
        queue.request_frame("first");
        let batch = queue.take_frame();
        assert_eq!(batch.len(), 1);
        queue.request_frame("second");
        assert_eq!(queue.pending_frames(), 1);
        assert_eq!(queue.frame_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_timers_never_run_before_deadline(delays in proptest::collection::vec(0u64..500, 1..20), deadline in 0u64..600) {
            let mut queue = TaskQueue::new();
            for d in &delays {
                queue.set_timeout(*d, *d);
            }
            let ran = drain_by(&mut queue, deadline);
            prop_assert!(ran.iter().all(|d| *d <= deadline));
            prop_assert!(ran.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(ran.len() + queue.pending_timers(), delays.len());
        }
    }
}
