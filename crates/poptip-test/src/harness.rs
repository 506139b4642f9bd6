//! Scenario harness around a [`Tooltips`] runtime.

use poptip::{
    Callbacks, Environment, HookContext, InstanceId, Phase, PopperId, SettingsInput, Target,
    Tooltips,
};
use poptip_core::{Document, DomEvent, ElementId, EventKind, Point, Rect};
use std::cell::Cell;
use std::rc::Rc;

/// Title given to fixture elements.
pub const FIXTURE_TITLE: &str = "Tippy Content";

/// Class given to fixture elements.
pub const FIXTURE_CLASS: &str = "__tippy";

/// Test harness for driving tooltips through user interactions.
pub struct Harness {
    tips: Tooltips,
    next_x: f32,
}

impl Harness {
    /// Harness over an empty document in mouse mode.
    pub fn new() -> Self {
        Self::from_tooltips(Tooltips::new(Document::new()))
    }

    /// Harness over a touch-capable host.
    pub fn touch() -> Self {
        Self::from_tooltips(Tooltips::new(Document::new()).with_environment(Environment::touch()))
    }

    /// Harness over an existing runtime.
    pub fn from_tooltips(tips: Tooltips) -> Self {
        Self { tips, next_x: 40.0 }
    }

    /// The runtime.
    pub fn tips(&self) -> &Tooltips {
        &self.tips
    }

    /// The runtime, mutably.
    pub fn tips_mut(&mut self) -> &mut Tooltips {
        &mut self.tips
    }

    /// The document.
    pub fn document(&self) -> &Document {
        self.tips.document()
    }

    // === Fixtures ===

    /// A `<button>` titled [`FIXTURE_TITLE`] with class [`FIXTURE_CLASS`],
    /// laid out left to right in the middle of the viewport.
    pub fn element(&mut self) -> ElementId {
        self.element_titled(FIXTURE_TITLE)
    }

    /// A fixture button with a custom title.
    pub fn element_titled(&mut self, title: &str) -> ElementId {
        let x = self.next_x;
        self.next_x += 90.0;
        let doc = self.tips.document_mut();
        let el = doc.create_element("button");
        doc.add_class(el, FIXTURE_CLASS);
        if !title.is_empty() {
            doc.set_attribute(el, "title", title);
        }
        doc.set_rect(el, Rect::new(x, 300.0, 80.0, 24.0));
        doc.append_child(doc.body(), el);
        el
    }

    /// A plain `<div>` attached to the body.
    pub fn div(&mut self) -> ElementId {
        let doc = self.tips.document_mut();
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el);
        el
    }

    /// Create an instance; panics on error.
    pub fn create(&mut self, target: impl Into<Target>, input: SettingsInput) -> InstanceId {
        self.create_with(target, input, Callbacks::new())
    }

    /// Create an instance with callbacks; panics on error.
    pub fn create_with(
        &mut self,
        target: impl Into<Target>,
        input: SettingsInput,
        callbacks: Callbacks,
    ) -> InstanceId {
        self.tips
            .create(target, input, callbacks)
            .expect("tooltip creation failed")
    }

    /// Create a single-record instance and return its popper.
    pub fn create_one(&mut self, target: impl Into<Target>, input: SettingsInput) -> PopperId {
        let id = self.create(target, input);
        self.popper(id, 0)
    }

    /// Create a single-record instance with callbacks and return its popper.
    pub fn create_one_with(
        &mut self,
        target: impl Into<Target>,
        input: SettingsInput,
        callbacks: Callbacks,
    ) -> PopperId {
        let id = self.create_with(target, input, callbacks);
        self.popper(id, 0)
    }

    /// The `index`th popper of `instance`.
    pub fn popper(&self, instance: InstanceId, index: usize) -> PopperId {
        self.tips
            .instance(instance)
            .and_then(|i| i.poppers().get(index).copied())
            .expect("no popper at index")
    }

    // === Events ===

    /// Deliver an arbitrary event.
    pub fn dispatch(&mut self, event: DomEvent) -> &mut Self {
        self.tips.dispatch(&event);
        self
    }

    /// Pointer enters `el`.
    pub fn mouse_enter(&mut self, el: ElementId) -> &mut Self {
        self.dispatch(DomEvent::new(EventKind::MouseEnter, el))
    }

    /// Pointer leaves `el`.
    pub fn mouse_leave(&mut self, el: ElementId) -> &mut Self {
        self.dispatch(DomEvent::new(EventKind::MouseLeave, el))
    }

    /// Pointer moves over `el` at `at`.
    pub fn mouse_move(&mut self, el: ElementId, at: Point) -> &mut Self {
        self.dispatch(DomEvent::new(EventKind::MouseMove, el).at(at))
    }

    /// Click on `el`.
    pub fn click(&mut self, el: ElementId) -> &mut Self {
        self.dispatch(DomEvent::new(EventKind::Click, el))
    }

    /// Focus `el`.
    pub fn focus(&mut self, el: ElementId) -> &mut Self {
        self.tips.document_mut().focus(el);
        self.dispatch(DomEvent::new(EventKind::Focus, el))
    }

    /// Focus moves from `el` to `to`.
    pub fn blur_to(&mut self, el: ElementId, to: ElementId) -> &mut Self {
        self.tips.document_mut().focus(to);
        self.dispatch(DomEvent::new(EventKind::Blur, el).related(to))
    }

    /// Touch starts on `el`.
    pub fn touch_start(&mut self, el: ElementId) -> &mut Self {
        self.dispatch(DomEvent::new(EventKind::TouchStart, el))
    }

    /// The document scrolls.
    pub fn scroll(&mut self) -> &mut Self {
        let body = self.document().body();
        self.dispatch(DomEvent::new(EventKind::Scroll, body))
    }

    // === Time ===

    /// Advance the clock by `ms`.
    pub fn advance(&mut self, ms: u64) -> &mut Self {
        self.tips.advance(ms);
        self
    }

    /// Run every pending timer.
    pub fn settle(&mut self) -> &mut Self {
        self.tips.run_timers();
        self
    }

    /// Run `n` animation frames.
    pub fn frames(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.tips.run_frame();
        }
        self
    }

    // === Queries ===

    /// Whether `popper` is entering or shown.
    pub fn is_visible(&self, popper: PopperId) -> bool {
        self.tips.is_visible(popper)
    }

    /// Whether `popper` is attached to the document.
    pub fn is_mounted(&self, popper: PopperId) -> bool {
        self.document().is_connected(popper)
    }

    /// Whether `popper` still has a record.
    pub fn is_registered(&self, popper: PopperId) -> bool {
        self.tips.registry().by_popper(popper).is_some()
    }

    /// Panic unless every record's popper is attached exactly when it is
    /// visible or leaving.
    pub fn assert_registry_consistent(&self) {
        for record in self.tips.registry().iter() {
            let mounted = self.is_mounted(record.popper_id());
            let expected = record.phase != Phase::Unmounted;
            assert_eq!(
                mounted, expected,
                "record {} in phase {:?} has mounted = {mounted}",
                record.id, record.phase
            );
        }
    }
}

/// Counts callback invocations.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Rc<Cell<usize>>);

impl CallCounter {
    /// A counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A lifecycle callback that increments this counter.
    pub fn hook(&self) -> impl FnMut(&mut HookContext<'_>) + 'static {
        let count = Rc::clone(&self.0);
        move |_| count.set(count.get() + 1)
    }

    /// Calls so far.
    pub fn count(&self) -> usize {
        self.0.get()
    }
}
