//! Placement solver that records how the engine drives it.

use poptip::{Placement, PlacementHandle, PlacementSolver, PopperOptions, RectSolver};
use poptip_core::{Document, ElementId};
use std::cell::RefCell;
use std::rc::Rc;

/// Calls observed by a [`RecordingSolver`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverLog {
    /// Options passed to each `create`
    pub created: Vec<PopperOptions>,
    /// `update` calls across all handles
    pub updates: usize,
    /// `force_update` calls across all handles
    pub forced_updates: usize,
    /// `destroy` calls across all handles
    pub destroyed: usize,
    /// Last value passed to `set_event_listeners`
    pub listeners_enabled: Option<bool>,
}

/// Wraps [`RectSolver`] and records every call into a shared [`SolverLog`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSolver {
    log: Rc<RefCell<SolverLog>>,
}

impl RecordingSolver {
    /// A solver with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the log.
    pub fn log(&self) -> SolverLog {
        self.log.borrow().clone()
    }
}

impl PlacementSolver for RecordingSolver {
    fn create(
        &self,
        doc: &Document,
        reference: ElementId,
        popper: ElementId,
        options: &PopperOptions,
    ) -> Box<dyn PlacementHandle> {
        self.log.borrow_mut().created.push(*options);
        Box::new(RecordingHandle {
            inner: RectSolver.create(doc, reference, popper, options),
            log: Rc::clone(&self.log),
        })
    }
}

#[derive(Debug)]
struct RecordingHandle {
    inner: Box<dyn PlacementHandle>,
    log: Rc<RefCell<SolverLog>>,
}

impl PlacementHandle for RecordingHandle {
    fn update(&mut self, doc: &Document) -> Option<Placement> {
        self.log.borrow_mut().updates += 1;
        self.inner.update(doc)
    }

    fn force_update(&mut self, doc: &Document) -> Option<Placement> {
        self.log.borrow_mut().forced_updates += 1;
        self.inner.force_update(doc)
    }

    fn set_event_listeners(&mut self, enabled: bool) {
        self.log.borrow_mut().listeners_enabled = Some(enabled);
        self.inner.set_event_listeners(enabled);
    }

    fn event_listeners_enabled(&self) -> bool {
        self.inner.event_listeners_enabled()
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().destroyed += 1;
        self.inner.destroy();
    }
}
