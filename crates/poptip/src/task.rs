//! Deferred work queued on the runtime's task queue.

use crate::engine::PopperId;

/// A unit of deferred work, always addressed by popper.
///
/// Popper elements are never reused, so a task whose popper no longer has a
/// record is stale and is dropped when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Delayed show from a trigger
    DelayedShow(PopperId),
    /// Delayed hide from a leave/blur/click
    DelayedHide(PopperId),
    /// Second half of show, run one tick after mounting
    ShowBlock {
        /// Popper being shown
        popper: PopperId,
        /// Transition duration for this show
        duration: u64,
    },
    /// Transition completion when the renderer never reports `transitionend`
    TransitionFallback(PopperId),
    /// One sticky repositioning pass
    StickyTick(PopperId),
    /// Restore the flip transition after a content-change reposition
    RestoreFlipDuration(PopperId),
}

impl Task {
    /// Popper the task belongs to.
    #[must_use]
    pub const fn popper(&self) -> PopperId {
        match *self {
            Self::DelayedShow(p)
            | Self::DelayedHide(p)
            | Self::ShowBlock { popper: p, .. }
            | Self::TransitionFallback(p)
            | Self::StickyTick(p)
            | Self::RestoreFlipDuration(p) => p,
        }
    }
}
