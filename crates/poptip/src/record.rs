//! Per-reference tooltip records.

use crate::engine::InstanceId;
use crate::factory::PopperElement;
use crate::listeners::Listener;
use crate::placement::PlacementHandle;
use crate::settings::Settings;
use poptip_core::{ElementId, ObserverId, TaskId};

/// Visibility phase of a record.
///
/// `Entering` and `Leaving` are the transition halves; the popper is attached
/// to its container in every phase except `Unmounted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Detached from the document
    #[default]
    Unmounted,
    /// Mounted and transitioning in
    Entering,
    /// Show transition complete
    Shown,
    /// Transitioning out, still mounted
    Leaving,
}

impl Phase {
    /// Visible in the ARIA sense: entering or shown.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Entering | Self::Shown)
    }
}

/// Pending timers owned by a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordTimers {
    /// Delayed show from a trigger
    pub show_delay: Option<TaskId>,
    /// Delayed hide from a leave/blur
    pub hide_delay: Option<TaskId>,
    /// Deferred second half of show
    pub show_block: Option<TaskId>,
}

/// Direction of an in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Show transition
    Show,
    /// Hide transition
    Hide,
}

/// A transition waiting for `transitionend` or its fallback timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    /// Direction
    pub kind: TransitionKind,
    /// Fallback timer racing the renderer's `transitionend`
    pub fallback: TaskId,
}

/// Document-level watch installed when an interactive tooltip's reference is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractiveWatch {
    /// Document scroll also hides
    pub hide_on_scroll: bool,
}

/// One reference element and its popper.
#[derive(Debug)]
pub struct TooltipRecord {
    /// Process-unique, increasing id
    pub id: u64,
    /// Anchor element (owned by the host document)
    pub reference: ElementId,
    /// Popper subtree
    pub popper: PopperElement,
    /// Evaluated settings
    pub settings: Settings,
    /// Listeners bound on `reference`
    pub listeners: Vec<Listener>,
    /// Owning instance
    pub owner: InstanceId,
    /// Placement handle, created on first show
    pub placement: Option<Box<dyn PlacementHandle>>,
    /// Content mutation observer, created with the placement handle
    pub observer: Option<ObserverId>,
    /// Set once the show transition completes; cleared on hide
    pub shown: bool,
    /// Visibility phase
    pub phase: Phase,
    /// Pending timers
    pub timers: RecordTimers,
    /// In-flight transition
    pub transition: Option<PendingTransition>,
    /// Interactive leave watch
    pub watch: Option<InteractiveWatch>,
    /// Follow-cursor mousemove listener bound on `reference`
    pub follow_cursor_bound: bool,
}

impl TooltipRecord {
    /// Create an unmounted record.
    #[must_use]
    pub fn new(
        id: u64,
        reference: ElementId,
        popper: PopperElement,
        settings: Settings,
        listeners: Vec<Listener>,
        owner: InstanceId,
    ) -> Self {
        Self {
            id,
            reference,
            popper,
            settings,
            listeners,
            owner,
            placement: None,
            observer: None,
            shown: false,
            phase: Phase::Unmounted,
            timers: RecordTimers::default(),
            transition: None,
            watch: None,
            follow_cursor_bound: false,
        }
    }

    /// Outer popper element.
    #[must_use]
    pub const fn popper_id(&self) -> ElementId {
        self.popper.popper
    }

    /// Whether the tooltip is entering or shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.phase.is_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_visibility() {
        assert!(!Phase::Unmounted.is_visible());
        assert!(Phase::Entering.is_visible());
        assert!(Phase::Shown.is_visible());
        assert!(!Phase::Leaving.is_visible());
    }
}
