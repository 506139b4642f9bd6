//! Tooltip lifecycle engine.
//!
//! [`Tooltips`] owns the document, the task queue, the registry and every
//! instance. All state transitions happen synchronously inside its methods;
//! anything that has to wait (delays, the deferred half of show, transition
//! fallbacks, sticky frames) is queued as a [`Task`] and runs when the host
//! advances the clock or runs a frame.
//!
//! Per-record state machine:
//!
//! ```text
//! Unmounted ──show──▶ Entering ──transition end──▶ Shown
//!     ▲                  │                           │
//!     │                 hide                        hide
//!     │                  ▼                           │
//!     └──transition end── Leaving ◀──────────────────┘
//! ```

use crate::callbacks::{Callbacks, Command, ContentKind, HookContext, HookKind, WaitContext};
use crate::config::Environment;
use crate::error::{Error, LookupError};
use crate::evaluate::evaluate;
use crate::factory::{
    copy_template, create_popper, find_template, offset_distance_px, PopperElement,
    ORIGINAL_TITLE_ATTR, PLACEMENT_ATTR, TOOLTIPPED_ATTR, TRANSITION_DURATION,
};
use crate::global::TouchState;
use crate::listeners::listeners_for;
use crate::placement::{Placement, PlacementSolver, PopperOptions, RectSolver};
use crate::record::{PendingTransition, Phase, TooltipRecord, TransitionKind};
use crate::registry::Registry;
use crate::settings::{HtmlContent, Setting, Settings, SettingsInput, TriggerEvent};
use crate::task::Task;
use poptip_core::{Document, DomEvent, ElementId, Selector, TaskQueue};

/// A popper element. Popper elements are never reused, so the id alone
/// identifies a record for its whole life.
pub type PopperId = ElementId;

/// Index of an instance within its runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub usize);

/// Upper bound on timers run by one [`Tooltips::run_timers`] call.
const MAX_TIMER_RUN: usize = 10_000;

/// Elements a new instance attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every connected element matching a selector
    Selector(String),
    /// One element
    Element(ElementId),
    /// Several elements, in order
    Elements(Vec<ElementId>),
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<ElementId> for Target {
    fn from(el: ElementId) -> Self {
        Self::Element(el)
    }
}

impl From<Vec<ElementId>> for Target {
    fn from(els: Vec<ElementId>) -> Self {
        Self::Elements(els)
    }
}

/// Result of the checks run before a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowGate {
    /// Go ahead
    Proceed,
    /// Do nothing
    Abort,
    /// The reference left the document; destroy the record instead
    AbortAndDestroy,
}

/// Records created together from one configuration call.
#[derive(Debug)]
pub struct Instance {
    id: InstanceId,
    pub(crate) settings: Settings,
    pub(crate) callbacks: Callbacks,
    pub(crate) records: Vec<PopperId>,
    pub(crate) destroyed: bool,
}

impl Instance {
    /// Instance id.
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// Shared base settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Poppers of live records, in creation order.
    #[must_use]
    pub fn poppers(&self) -> &[PopperId] {
        &self.records
    }

    /// Whether `destroy_all` has run.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// The tooltip runtime.
#[derive(Debug)]
pub struct Tooltips {
    pub(crate) document: Document,
    pub(crate) tasks: TaskQueue<Task>,
    pub(crate) registry: Registry,
    pub(crate) instances: Vec<Instance>,
    pub(crate) solver: Box<dyn PlacementSolver>,
    pub(crate) env: Environment,
    pub(crate) touch: TouchState,
    next_record_id: u64,
}

impl Tooltips {
    /// Create a runtime over `document` with the built-in solver.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document,
            tasks: TaskQueue::new(),
            registry: Registry::new(),
            instances: Vec::new(),
            solver: Box::new(RectSolver),
            env: Environment::default(),
            touch: TouchState::default(),
            next_record_id: 1,
        }
    }

    /// Use a different placement solver.
    #[must_use]
    pub fn with_solver(mut self, solver: impl PlacementSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    /// Describe the host's capabilities.
    #[must_use]
    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access for the host. Call [`Self::flush_mutations`]
    /// afterwards if popper content changed.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The global registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Host environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.env
    }

    /// Pending work.
    #[must_use]
    pub const fn tasks(&self) -> &TaskQueue<Task> {
        &self.tasks
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.tasks.now()
    }

    /// An instance by id.
    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id.0)
    }

    /// Record whose reference or popper is `el`.
    #[must_use]
    pub fn record(&self, el: ElementId) -> Option<&TooltipRecord> {
        self.registry
            .find(|r| r.reference == el || r.popper_id() == el)
    }

    /// Popper attached to `reference`.
    pub fn popper_of(&self, reference: ElementId) -> Option<PopperId> {
        let popper = self.registry.by_reference(reference).map(TooltipRecord::popper_id);
        if popper.is_none() {
            tracing::error!(error = %LookupError::UnknownReference(reference), "popper_of");
        }
        popper
    }

    /// Reference element of `popper`.
    pub fn reference_of(&self, popper: PopperId) -> Option<ElementId> {
        let reference = self.registry.by_popper(popper).map(|r| r.reference);
        if reference.is_none() {
            tracing::error!(error = %LookupError::UnknownPopper(popper), "reference_of");
        }
        reference
    }

    /// Visibility phase of `popper`'s record.
    #[must_use]
    pub fn phase(&self, popper: PopperId) -> Option<Phase> {
        self.registry.by_popper(popper).map(|r| r.phase)
    }

    /// Whether `popper` is entering or shown.
    #[must_use]
    pub fn is_visible(&self, popper: PopperId) -> bool {
        self.registry
            .by_popper(popper)
            .is_some_and(TooltipRecord::is_visible)
    }

    pub(crate) fn lookup(&self, popper: PopperId) -> Result<&TooltipRecord, LookupError> {
        self.registry
            .by_popper(popper)
            .ok_or(LookupError::UnknownPopper(popper))
    }

    pub(crate) fn instance_destroyed(&self, id: InstanceId) -> bool {
        self.instances.get(id.0).map_or(true, |i| i.destroyed)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create tooltips for every qualifying element of `target`.
    ///
    /// An element qualifies when it has a non-empty `title`, when `html` is
    /// set, or when the callbacks render their own content.
    pub fn create(
        &mut self,
        target: impl Into<Target>,
        input: SettingsInput,
        callbacks: Callbacks,
    ) -> Result<InstanceId, Error> {
        let elements = self.resolve_target(target.into())?;
        let settings = evaluate(input.merge(&Settings::default()), &self.document);
        if let Some(HtmlContent::Template(selector)) = &settings.html {
            if find_template(&self.document, selector).is_none() {
                return Err(Error::TemplateNotFound(selector.clone()));
            }
        }

        let id = InstanceId(self.instances.len());
        self.instances.push(Instance {
            id,
            settings: settings.clone(),
            callbacks,
            records: Vec::new(),
            destroyed: false,
        });

        for reference in elements {
            let Some(record) = self.build_record(id, reference, &settings) else {
                tracing::debug!(?reference, "no tooltip content; skipped");
                continue;
            };
            let popper = record.popper_id();
            self.registry.push(record);
            if let Some(instance) = self.instances.get_mut(id.0) {
                instance.records.push(popper);
            }
        }

        tracing::debug!(
            instance = id.0,
            tooltips = self.instances.get(id.0).map_or(0, |i| i.records.len()),
            "created instance"
        );
        Ok(id)
    }

    /// Create tooltips with settings loaded from YAML.
    pub fn create_from_yaml(
        &mut self,
        target: impl Into<Target>,
        yaml: &str,
        callbacks: Callbacks,
    ) -> Result<InstanceId, Error> {
        let input = SettingsInput::from_yaml(yaml)?;
        self.create(target, input, callbacks)
    }

    fn resolve_target(&self, target: Target) -> Result<Vec<ElementId>, Error> {
        Ok(match target {
            Target::Selector(selector) => {
                let selector = Selector::parse(&selector)?;
                self.document.query_selector_all(&selector)
            }
            Target::Element(el) => vec![el],
            Target::Elements(els) => els,
        })
    }

    fn build_record(
        &mut self,
        owner: InstanceId,
        reference: ElementId,
        settings: &Settings,
    ) -> Option<TooltipRecord> {
        let title = self
            .document
            .get_attribute(reference, "title")
            .unwrap_or_default()
            .to_string();
        let renders = self
            .instances
            .get(owner.0)
            .is_some_and(|i| i.callbacks.has_renderer());
        if title.is_empty() && settings.html.is_none() && !renders {
            return None;
        }

        let id = self.next_record_id;
        self.next_record_id += 1;

        self.document.set_attribute(reference, TOOLTIPPED_ATTR, "");
        remove_title(&mut self.document, reference);

        let popper = create_popper(&mut self.document, id, &title, settings);
        let listeners = listeners_for(&settings.trigger, settings.touch_hold, &self.env);
        Some(TooltipRecord::new(
            id,
            reference,
            popper,
            settings.clone(),
            listeners,
            owner,
        ))
    }

    // =========================================================================
    // Show
    // =========================================================================

    /// Checks run before showing `popper`.
    #[must_use]
    pub fn show_gate(&self, popper: PopperId) -> ShowGate {
        let record = match self.lookup(popper) {
            Ok(record) => record,
            Err(error) => {
                tracing::error!(%error, "show");
                return ShowGate::Abort;
            }
        };
        if self.instance_destroyed(record.owner)
            || record.is_visible()
            || self.document.get_attribute(record.reference, "disabled") == Some("disabled")
        {
            return ShowGate::Abort;
        }
        if !self.document.is_connected(record.reference) {
            return ShowGate::AbortAndDestroy;
        }
        ShowGate::Proceed
    }

    /// Show `popper` now, cancelling pending delayed show/hide.
    pub fn show(&mut self, popper: PopperId) {
        self.show_with_duration(popper, None);
    }

    /// Show `popper` with a custom transition duration.
    pub fn show_with_duration(&mut self, popper: PopperId, duration: Option<u64>) {
        self.cancel_delays(popper);
        self.show_now(popper, duration);
        self.flush_mutations();
    }

    pub(crate) fn show_now(&mut self, popper: PopperId, custom_duration: Option<u64>) {
        match self.show_gate(popper) {
            ShowGate::Proceed => {}
            ShowGate::Abort => return,
            ShowGate::AbortAndDestroy => {
                tracing::debug!(?popper, "reference left the document; destroying tooltip");
                self.destroy_record(popper);
                return;
            }
        }

        self.fire(popper, HookKind::Show);

        let Ok(record) = self.lookup(popper) else {
            return;
        };
        // Controlled-closed: the show callback observes the attempt, nothing else happens.
        if record.settings.open == Some(false) || record.is_visible() {
            return;
        }
        let parts = record.popper;
        let reference = record.reference;
        let container = record.settings.append_to.container(&self.document);
        let follow_cursor = record.settings.follow_cursor;
        let duration = custom_duration.unwrap_or_else(|| record.settings.show_duration());

        self.run_content_hook(popper, ContentKind::Render);

        for el in std::iter::once(parts.popper).chain(parts.animated()) {
            self.document.set_style(el, TRANSITION_DURATION, "0ms");
        }

        if !self.document.contains(container, parts.popper) {
            self.document.append_child(container, parts.popper);
            self.mount_placement(popper);
            let follow = follow_cursor && !self.touch.active;
            if let Some(record) = self.registry.by_popper_mut(popper) {
                record.follow_cursor_bound = follow;
                if let Some(handle) = record.placement.as_mut() {
                    handle.set_event_listeners(!follow);
                }
            }
        }

        self.document.set_style(parts.popper, "visibility", "visible");
        self.document.set_attribute(parts.popper, "aria-hidden", "false");
        let dom_id = self
            .document
            .get_attribute(parts.popper, "id")
            .unwrap_or_default()
            .to_string();
        self.document
            .set_attribute(reference, "aria-describedby", &dom_id);

        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        if let Some(pending) = record.transition.take() {
            self.tasks.cancel(pending.fallback);
        }
        if let Some(block) = record.timers.show_block.take() {
            self.tasks.cancel(block);
        }
        record.phase = Phase::Entering;
        record.timers.show_block = Some(self.tasks.defer(Task::ShowBlock { popper, duration }));
        tracing::trace!(id = record.id, duration, "showing");
    }

    fn mount_placement(&mut self, popper: PopperId) {
        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        let placement = match record.placement.as_mut() {
            Some(handle) => handle.force_update(&self.document),
            None => {
                let options = PopperOptions::from_settings(&record.settings);
                let mut handle =
                    self.solver
                        .create(&self.document, record.reference, popper, &options);
                let placement = handle.update(&self.document);
                record.placement = Some(handle);
                record.observer = Some(self.document.observe(popper));
                placement
            }
        };
        let (parts, distance) = (record.popper, record.settings.distance);
        if let Some(placement) = placement {
            apply_placement(&mut self.document, &parts, distance, placement);
        }
    }

    /// Recompute `popper`'s placement through its handle, if it has one.
    pub(crate) fn update_placement(&mut self, popper: PopperId, force: bool) {
        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        let Some(handle) = record.placement.as_mut() else {
            return;
        };
        let placement = if force {
            handle.force_update(&self.document)
        } else {
            handle.update(&self.document)
        };
        let (parts, distance) = (record.popper, record.settings.distance);
        if let Some(placement) = placement {
            apply_placement(&mut self.document, &parts, distance, placement);
        }
    }

    fn run_show_block(&mut self, popper: PopperId, duration: u64) {
        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        record.timers.show_block = None;
        if !record.is_visible() {
            return;
        }
        let parts = record.popper;
        let reference = record.reference;
        let settings = &record.settings;
        let (follow_cursor, flip_duration, interactive, sticky) = (
            settings.follow_cursor,
            settings.flip_duration,
            settings.interactive,
            settings.sticky,
        );

        if !follow_cursor || self.touch.active {
            self.update_placement(popper, true);
            self.document
                .set_style(parts.popper, TRANSITION_DURATION, &format!("{flip_duration}ms"));
        }

        for el in parts.animated() {
            self.document
                .set_style(el, TRANSITION_DURATION, &format!("{duration}ms"));
        }
        if parts.circle.is_some() {
            self.document.set_style(parts.content, "opacity", "1");
        }
        if interactive {
            self.document.add_class(reference, "active");
        }
        if sticky {
            self.start_sticky(popper);
        }

        for el in parts.animated() {
            self.document.remove_class(el, "tippy-notransition");
            self.document.remove_class(el, "leave");
            self.document.add_class(el, "enter");
        }

        self.wait_for_transition(popper, TransitionKind::Show, duration);
    }

    fn complete_show(&mut self, popper: PopperId) {
        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        if !record.is_visible() || record.shown {
            return;
        }
        record.shown = true;
        record.phase = Phase::Shown;
        let (parts, interactive) = (record.popper, record.settings.interactive);

        if interactive {
            self.document.focus(parts.popper);
        }
        self.document.add_class(parts.tooltip, "tippy-notransition");
        tracing::trace!(?popper, "shown");
        self.fire(popper, HookKind::Shown);
    }

    // =========================================================================
    // Hide
    // =========================================================================

    /// Hide `popper` now, cancelling pending delayed show/hide.
    pub fn hide(&mut self, popper: PopperId) {
        self.hide_with_duration(popper, None);
    }

    /// Hide `popper` with a custom transition duration.
    pub fn hide_with_duration(&mut self, popper: PopperId, duration: Option<u64>) {
        self.cancel_delays(popper);
        self.hide_now(popper, duration, false);
        self.flush_mutations();
    }

    /// Hide; `force` bypasses the controlled-open guard (used by destroy).
    pub(crate) fn hide_now(&mut self, popper: PopperId, custom_duration: Option<u64>, force: bool) {
        let record = match self.lookup(popper) {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!(%error, "hide");
                return;
            }
        };
        if self.instance_destroyed(record.owner) || !record.is_visible() {
            return;
        }

        self.fire(popper, HookKind::Hide);

        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        if !record.is_visible() {
            return;
        }
        // Controlled-open blocks implicit hides.
        if !force && !record.settings.disabled && record.settings.open == Some(true) {
            tracing::trace!(id = record.id, "hide blocked by open");
            return;
        }

        let parts = record.popper;
        let reference = record.reference;
        let duration = custom_duration.unwrap_or_else(|| record.settings.hide_duration_ms());
        let interactive = record.settings.interactive;
        let refocus = record.settings.html.is_some()
            && record
                .settings
                .trigger
                .contains(TriggerEvent::Click);
        record.shown = false;
        record.watch = None;

        if interactive {
            self.document.remove_class(reference, "active");
        }
        self.document.set_style(parts.popper, "visibility", "hidden");
        self.document.set_attribute(parts.popper, "aria-hidden", "true");
        self.document.remove_attribute(reference, "aria-describedby");

        for el in parts.animated() {
            self.document
                .set_style(el, TRANSITION_DURATION, &format!("{duration}ms"));
        }
        if parts.circle.is_some() {
            // Content fades out a little ahead of the fill.
            let content_duration = (duration as f64 / 1.3).round() as u64;
            self.document.set_style(
                parts.content,
                TRANSITION_DURATION,
                &format!("{content_duration}ms"),
            );
            self.document.set_style(parts.content, "opacity", "0");
        }

        for el in parts.animated() {
            self.document.remove_class(el, "tippy-notransition");
            self.document.remove_class(el, "enter");
            self.document.add_class(el, "leave");
        }

        if refocus && self.document.in_viewport(reference) {
            self.document.focus(reference);
        }

        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        if let Some(block) = record.timers.show_block.take() {
            self.tasks.cancel(block);
        }
        record.phase = Phase::Leaving;
        tracing::trace!(id = record.id, duration, "hiding");
        self.wait_for_transition(popper, TransitionKind::Hide, duration);
    }

    fn complete_hide(&mut self, popper: PopperId) {
        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        if record.is_visible() {
            return;
        }
        let parts = record.popper;
        let container = record.settings.append_to.container(&self.document);
        if !self.document.contains(container, parts.popper) {
            record.phase = Phase::Unmounted;
            return;
        }
        // A show raced this hide and the tooltip is animating back in.
        if self.document.has_class(parts.tooltip, "enter") {
            return;
        }

        record.follow_cursor_bound = false;
        if let Some(handle) = record.placement.as_mut() {
            handle.set_event_listeners(false);
        }
        record.phase = Phase::Unmounted;
        let unmount = record.settings.unmount_html_when_hide;
        self.document.detach(parts.popper);
        tracing::trace!(?popper, "hidden");

        self.fire(popper, HookKind::Hidden);
        if unmount {
            self.run_content_hook(popper, ContentKind::Unmount);
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn wait_for_transition(&mut self, popper: PopperId, kind: TransitionKind, duration: u64) {
        if let Some(record) = self.registry.by_popper_mut(popper) {
            if let Some(previous) = record.transition.take() {
                self.tasks.cancel(previous.fallback);
            }
        }
        if duration == 0 {
            self.complete_transition(popper, kind);
            return;
        }
        let fallback = self
            .tasks
            .set_timeout(duration, Task::TransitionFallback(popper));
        if let Some(record) = self.registry.by_popper_mut(popper) {
            record.transition = Some(PendingTransition { kind, fallback });
        }
    }

    fn complete_transition(&mut self, popper: PopperId, kind: TransitionKind) {
        match kind {
            TransitionKind::Show => self.complete_show(popper),
            TransitionKind::Hide => self.complete_hide(popper),
        }
    }

    fn settle_transition(&mut self, popper: PopperId) {
        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        let Some(pending) = record.transition.take() else {
            return;
        };
        self.tasks.cancel(pending.fallback);
        self.complete_transition(popper, pending.kind);
    }

    /// The renderer reports that `el`'s CSS transition ended.
    ///
    /// `el` may be the tooltip box or the popper. Completion runs at most once
    /// per transition, whichever of this and the fallback timer comes first.
    pub fn transition_end(&mut self, el: ElementId) {
        let popper = self
            .registry
            .find(|r| r.popper.tooltip == el || r.popper_id() == el)
            .map(TooltipRecord::popper_id);
        if let Some(popper) = popper {
            self.settle_transition(popper);
            self.flush_mutations();
        }
    }

    // =========================================================================
    // Content and settings
    // =========================================================================

    /// Refresh `popper`'s content from its title or template.
    pub fn update(&mut self, popper: PopperId) {
        let record = match self.lookup(popper) {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!(%error, "update");
                return;
            }
        };
        if self.instance_destroyed(record.owner) {
            return;
        }
        let (content, reference) = (record.popper.content, record.reference);
        match record.settings.html.clone() {
            Some(HtmlContent::Element(_)) => {
                tracing::warn!(
                    ?popper,
                    "update() aborted: html is an element; patch the `html` setting instead"
                );
                return;
            }
            Some(HtmlContent::Template(selector)) => {
                copy_template(&mut self.document, &selector, content);
            }
            None => {
                let text = self
                    .document
                    .get_attribute(reference, "title")
                    .filter(|t| !t.is_empty())
                    .or_else(|| self.document.get_attribute(reference, ORIGINAL_TITLE_ATTR))
                    .unwrap_or_default()
                    .to_string();
                self.document.set_inner(content, &text);
                remove_title(&mut self.document, reference);
            }
        }
        self.flush_mutations();
    }

    /// Patch one setting of `popper`'s record.
    ///
    /// `disabled` and `open` only change state. Every other key rebuilds the
    /// record: the old popper is destroyed and a new one takes its registry
    /// slot. Returns the popper now serving the reference.
    pub fn update_settings(&mut self, popper: PopperId, setting: Setting) -> Option<PopperId> {
        let result = self.apply_setting(popper, setting);
        self.flush_mutations();
        result
    }

    fn apply_setting(&mut self, popper: PopperId, setting: Setting) -> Option<PopperId> {
        let record = match self.lookup(popper) {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!(%error, "update_settings");
                return None;
            }
        };
        if self.instance_destroyed(record.owner) {
            return None;
        }
        let index = self.registry.position(|r| r.popper_id() == popper)?;
        let (owner, reference) = (record.owner, record.reference);
        let key = setting.key();
        let redraws = setting.redraws();

        let mut settings = record.settings.clone();
        setting.apply(&mut settings);
        let settings = evaluate(settings, &self.document);

        if !redraws {
            if let Some(record) = self.registry.by_popper_mut(popper) {
                record.settings = settings;
            }
            return Some(popper);
        }

        let slot = self
            .instances
            .get(owner.0)
            .and_then(|i| i.records.iter().position(|p| *p == popper));
        self.destroy_record(popper);
        if let Some(instance) = self.instances.get_mut(owner.0) {
            instance.settings = settings.clone();
        }

        let record = self.build_record(owner, reference, &settings)?;
        let replacement = record.popper_id();
        self.registry.insert(index, record);
        if let Some(instance) = self.instances.get_mut(owner.0) {
            let at = slot.unwrap_or(instance.records.len()).min(instance.records.len());
            instance.records.insert(at, replacement);
        }
        tracing::debug!(key, old = ?popper, new = ?replacement, "rebuilt tooltip");
        Some(replacement)
    }

    /// Re-enable `popper`.
    pub fn enable(&mut self, popper: PopperId) {
        self.apply_setting(popper, Setting::Disabled(false));
        if let Some(reference) = self.registry.by_popper(popper).map(|r| r.reference) {
            self.document.remove_attribute(reference, "disabled");
        }
        self.flush_mutations();
    }

    /// Disable `popper`, hiding it if visible.
    pub fn disable(&mut self, popper: PopperId) {
        self.apply_setting(popper, Setting::Disabled(true));
        if let Some(reference) = self.registry.by_popper(popper).map(|r| r.reference) {
            self.document.set_attribute(reference, "disabled", "disabled");
        }
        if self.is_visible(popper) {
            self.hide(popper);
        }
        self.flush_mutations();
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Destroy `popper`'s record. Calling it again is a logged no-op.
    pub fn destroy(&mut self, popper: PopperId) {
        let record = match self.lookup(popper) {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!(%error, "destroy");
                return;
            }
        };
        if self.instance_destroyed(record.owner) {
            return;
        }
        self.destroy_record(popper);
        self.flush_mutations();
    }

    pub(crate) fn destroy_record(&mut self, popper: PopperId) {
        if self.is_visible(popper) {
            self.hide_now(popper, Some(0), true);
        }
        // A callback fired by the hide may already have destroyed it.
        let Some(index) = self.registry.position(|r| r.popper_id() == popper) else {
            return;
        };
        let Some(mut record) = self.registry.remove(index) else {
            return;
        };

        self.document.detach(popper);
        self.tasks.cancel_where(|task| task.popper() == popper);

        let reference = record.reference;
        let original = self
            .document
            .get_attribute(reference, ORIGINAL_TITLE_ATTR)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if let Some(title) = original {
            self.document.set_attribute(reference, "title", &title);
        }
        self.document.remove_attribute(reference, ORIGINAL_TITLE_ATTR);
        self.document.remove_attribute(reference, TOOLTIPPED_ATTR);
        self.document.remove_attribute(reference, "aria-describedby");

        if let Some(mut handle) = record.placement.take() {
            handle.destroy();
        }
        if let Some(observer) = record.observer.take() {
            self.document.disconnect(observer);
        }
        if let Some(instance) = self.instances.get_mut(record.owner.0) {
            instance.records.retain(|p| *p != popper);
        }
        tracing::debug!(id = record.id, ?popper, "destroyed tooltip");
    }

    /// Destroy every record of `instance` and mark it destroyed.
    pub fn destroy_all(&mut self, instance: InstanceId) {
        let Some(entry) = self.instances.get(instance.0) else {
            tracing::debug!(error = %LookupError::UnknownInstance(instance), "destroy_all");
            return;
        };
        if entry.destroyed {
            return;
        }
        let poppers = entry.records.clone();
        for popper in poppers {
            self.destroy_record(popper);
        }
        if let Some(entry) = self.instances.get_mut(instance.0) {
            entry.records.clear();
            entry.destroyed = true;
        }
        self.flush_mutations();
    }

    // =========================================================================
    // Delays
    // =========================================================================

    pub(crate) fn cancel_delays(&mut self, popper: PopperId) {
        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        let pending = [record.timers.show_delay.take(), record.timers.hide_delay.take()];
        for id in pending.into_iter().flatten() {
            self.tasks.cancel(id);
        }
    }

    /// Show after the `delay` setting, cancelling any pending delayed show/hide.
    pub fn schedule_show(&mut self, popper: PopperId) {
        self.cancel_delays(popper);
        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        if record.is_visible() {
            return;
        }
        let delay = record.settings.delay.show();
        if delay > 0 {
            record.timers.show_delay = Some(self.tasks.set_timeout(delay, Task::DelayedShow(popper)));
        } else {
            self.show_now(popper, None);
        }
    }

    /// Hide after the `delay` setting, cancelling any pending delayed show/hide.
    pub fn schedule_hide(&mut self, popper: PopperId) {
        self.cancel_delays(popper);
        let Some(record) = self.registry.by_popper_mut(popper) else {
            return;
        };
        let delay = record.settings.delay.hide();
        if delay > 0 {
            record.timers.hide_delay = Some(self.tasks.set_timeout(delay, Task::DelayedHide(popper)));
        } else {
            self.hide_now(popper, None, false);
        }
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Advance the clock by `ms`, running every timer that falls due.
    pub fn advance(&mut self, ms: u64) {
        let deadline = self.tasks.now().saturating_add(ms);
        while let Some((_, task)) = self.tasks.pop_due_by(deadline) {
            self.run_task(task);
        }
        self.tasks.settle_clock(deadline);
        self.flush_mutations();
    }

    /// Run deferred ticks (zero-delay timers) without moving the clock.
    pub fn tick(&mut self) {
        self.advance(0);
    }

    /// Run timers until none remain, jumping the clock to each deadline.
    /// Animation frames are not run. Returns how many timers ran.
    pub fn run_timers(&mut self) -> usize {
        let mut ran = 0;
        while ran < MAX_TIMER_RUN {
            let Some(deadline) = self.tasks.next_deadline() else {
                break;
            };
            let Some((_, task)) = self.tasks.pop_due_by(deadline) else {
                break;
            };
            self.run_task(task);
            ran += 1;
        }
        if ran == MAX_TIMER_RUN {
            tracing::warn!(ran, "timer run limit reached");
        }
        self.flush_mutations();
        ran
    }

    /// Run one animation frame. Returns how many callbacks ran.
    pub fn run_frame(&mut self) -> usize {
        let batch = self.tasks.take_frame();
        let ran = batch.len();
        for (_, task) in batch {
            self.run_task(task);
        }
        self.flush_mutations();
        ran
    }

    fn run_task(&mut self, task: Task) {
        if self.registry.by_popper(task.popper()).is_none() {
            tracing::trace!(?task, "stale task dropped");
            return;
        }
        match task {
            Task::DelayedShow(popper) => {
                if let Some(record) = self.registry.by_popper_mut(popper) {
                    record.timers.show_delay = None;
                }
                self.show_now(popper, None);
            }
            Task::DelayedHide(popper) => {
                if let Some(record) = self.registry.by_popper_mut(popper) {
                    record.timers.hide_delay = None;
                }
                self.hide_now(popper, None, false);
            }
            Task::ShowBlock { popper, duration } => self.run_show_block(popper, duration),
            Task::TransitionFallback(popper) => self.settle_transition(popper),
            Task::StickyTick(popper) => self.sticky_tick(popper),
            Task::RestoreFlipDuration(popper) => {
                if let Some(flip) = self.registry.by_popper(popper).map(|r| r.settings.flip_duration) {
                    self.document
                        .set_style(popper, TRANSITION_DURATION, &format!("{flip}ms"));
                }
            }
        }
    }

    /// Reposition poppers whose content changed since the last flush.
    ///
    /// Runs after every public operation; hosts that edit popper content
    /// through [`Self::document_mut`] call it themselves.
    pub fn flush_mutations(&mut self) {
        for observer in self.document.take_mutations() {
            let Some(popper) = self
                .registry
                .find(|r| r.observer == Some(observer))
                .map(TooltipRecord::popper_id)
            else {
                continue;
            };
            self.document.set_style(popper, TRANSITION_DURATION, "0ms");
            self.update_placement(popper, false);
            self.tasks.defer(Task::RestoreFlipDuration(popper));
        }
    }

    /// Reposition every mounted popper whose placement listeners are on,
    /// as a window scroll or resize would.
    pub fn reposition(&mut self) {
        let mounted: Vec<PopperId> = self
            .registry
            .iter()
            .filter(|r| {
                r.phase != Phase::Unmounted
                    && r.placement
                        .as_ref()
                        .is_some_and(|h| h.event_listeners_enabled())
            })
            .map(TooltipRecord::popper_id)
            .collect();
        for popper in mounted {
            self.update_placement(popper, false);
        }
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    pub(crate) fn fire(&mut self, popper: PopperId, kind: HookKind) {
        let Some(owner) = self.registry.by_popper(popper).map(|r| r.owner) else {
            return;
        };
        let Some(mut hook) = self
            .instances
            .get_mut(owner.0)
            .and_then(|i| i.callbacks.hook_slot(kind).take())
        else {
            return;
        };

        let mut commands = Vec::new();
        hook(&mut HookContext::new(&self.document, popper, owner, &mut commands));

        if let Some(instance) = self.instances.get_mut(owner.0) {
            let slot = instance.callbacks.hook_slot(kind);
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
        self.apply_commands(commands);
    }

    pub(crate) fn has_wait(&self, popper: PopperId) -> bool {
        self.registry
            .by_popper(popper)
            .and_then(|r| self.instances.get(r.owner.0))
            .is_some_and(|i| i.callbacks.has_wait())
    }

    pub(crate) fn fire_wait(&mut self, popper: PopperId, event: &DomEvent) {
        let Some(owner) = self.registry.by_popper(popper).map(|r| r.owner) else {
            return;
        };
        let Some(mut hook) = self
            .instances
            .get_mut(owner.0)
            .and_then(|i| i.callbacks.wait_slot().take())
        else {
            return;
        };

        let mut commands = Vec::new();
        {
            let context = HookContext::new(&self.document, popper, owner, &mut commands);
            hook(&mut WaitContext::new(context, event));
        }

        if let Some(instance) = self.instances.get_mut(owner.0) {
            let slot = instance.callbacks.wait_slot();
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
        self.apply_commands(commands);
    }

    fn run_content_hook(&mut self, popper: PopperId, kind: ContentKind) {
        let Some((owner, content)) = self
            .registry
            .by_popper(popper)
            .map(|r| (r.owner, r.popper.content))
        else {
            return;
        };
        let Some(mut hook) = self
            .instances
            .get_mut(owner.0)
            .and_then(|i| i.callbacks.content_slot(kind).take())
        else {
            return;
        };
        hook(&mut self.document, content);
        if let Some(instance) = self.instances.get_mut(owner.0) {
            let slot = instance.callbacks.content_slot(kind);
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }

    fn apply_commands(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Show(popper) => self.show(popper),
                Command::Hide(popper) => self.hide(popper),
                Command::ScheduleShow(popper) => self.schedule_show(popper),
                Command::Update(popper) => self.update(popper),
                Command::UpdateSettings(popper, setting) => {
                    self.update_settings(popper, setting);
                }
                Command::Enable(popper) => self.enable(popper),
                Command::Disable(popper) => self.disable(popper),
                Command::Destroy(popper) => self.destroy(popper),
                Command::DestroyAll(instance) => self.destroy_all(instance),
            }
        }
    }
}

impl Default for Tooltips {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

/// Move a non-empty `title` to `data-original-title` so the native tooltip never shows.
fn remove_title(doc: &mut Document, el: ElementId) {
    let title = doc
        .get_attribute(el, "title")
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    if let Some(title) = title {
        doc.set_attribute(el, ORIGINAL_TITLE_ATTR, &title);
    }
    doc.remove_attribute(el, "title");
}

/// Write a placement result into the popper subtree.
fn apply_placement(doc: &mut Document, parts: &PopperElement, distance: f32, placement: Placement) {
    doc.set_rect(parts.popper, placement.rect);
    doc.set_attribute(parts.popper, PLACEMENT_ATTR, placement.position.name());
    for side in ["top", "bottom", "left", "right"] {
        doc.set_style(parts.tooltip, side, "");
    }
    doc.set_style(
        parts.tooltip,
        placement.position.side().name(),
        &offset_distance_px(distance),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Timing, Trigger};
    use poptip_core::Rect;
    use std::cell::Cell;
    use std::rc::Rc;

    fn runtime_with_button(title: &str) -> (Tooltips, ElementId) {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.set_attribute(button, "title", title);
        doc.add_class(button, "tip");
        doc.set_rect(button, Rect::new(200.0, 200.0, 80.0, 30.0));
        doc.append_child(doc.body(), button);
        (Tooltips::new(doc), button)
    }

    fn instant() -> SettingsInput {
        SettingsInput {
            duration: Some(Timing::Single(0)),
            ..SettingsInput::default()
        }
    }

    #[test]
    fn test_create_moves_title() {
        let (mut tips, button) = runtime_with_button("Hello");
        let id = tips.create(".tip", instant(), Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];

        let doc = tips.document();
        assert_eq!(doc.get_attribute(button, "title"), None);
        assert_eq!(doc.get_attribute(button, ORIGINAL_TITLE_ATTR), Some("Hello"));
        assert!(doc.has_attribute(button, TOOLTIPPED_ATTR));
        assert_eq!(tips.reference_of(popper), Some(button));
        assert_eq!(tips.popper_of(button), Some(popper));
        assert_eq!(tips.record(button).map(|r| r.id), Some(1));
    }

    #[test]
    fn test_create_skips_elements_without_content() {
        let (mut tips, _) = runtime_with_button("");
        let id = tips.create(".tip", instant(), Callbacks::new()).unwrap();
        assert!(tips.instance(id).unwrap().poppers().is_empty());
        assert!(tips.registry().is_empty());
    }

    #[test]
    fn test_create_with_renderer_qualifies_without_title() {
        let (mut tips, _) = runtime_with_button("");
        let callbacks = Callbacks::new().render_content(|doc, content| doc.set_inner(content, "rendered"));
        let id = tips.create(".tip", instant(), callbacks).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        tips.show(popper);
        let content = tips.record(popper).unwrap().popper.content;
        assert_eq!(tips.document().text(content), "rendered");
    }

    #[test]
    fn test_create_errors() {
        let (mut tips, _) = runtime_with_button("x");
        assert!(matches!(
            tips.create("", instant(), Callbacks::new()),
            Err(Error::Selector(_))
        ));
        let input = SettingsInput {
            html: Some(HtmlContent::Template("#nope".to_string())),
            ..instant()
        };
        assert!(matches!(
            tips.create(".tip", input, Callbacks::new()),
            Err(Error::TemplateNotFound(_))
        ));
        assert!(tips.registry().is_empty());
    }

    #[test]
    fn test_show_then_hide_instant() {
        let (mut tips, button) = runtime_with_button("Hi");
        let id = tips.create(".tip", instant(), Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];

        tips.show(popper);
        assert_eq!(tips.phase(popper), Some(Phase::Entering));
        assert!(tips.document().is_connected(popper));
        assert_eq!(tips.document().get_attribute(popper, "aria-hidden"), Some("false"));
        assert_eq!(
            tips.document().get_attribute(button, "aria-describedby"),
            Some("tippy-tooltip-1")
        );

        tips.tick();
        assert_eq!(tips.phase(popper), Some(Phase::Shown));
        assert!(tips.document().get_attribute(popper, PLACEMENT_ATTR).is_some());

        tips.hide(popper);
        assert_eq!(tips.phase(popper), Some(Phase::Unmounted));
        assert!(!tips.document().is_connected(popper));
        assert_eq!(tips.document().get_attribute(button, "aria-describedby"), None);
    }

    #[test]
    fn test_transition_end_completes_once() {
        let (mut tips, _) = runtime_with_button("Hi");
        let id = tips.create(".tip", SettingsInput::default(), Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        let tooltip = tips.record(popper).unwrap().popper.tooltip;

        tips.show(popper);
        tips.tick();
        assert_eq!(tips.phase(popper), Some(Phase::Entering));
        assert_eq!(tips.document().style(tooltip, TRANSITION_DURATION), Some("350ms"));

        tips.transition_end(tooltip);
        assert_eq!(tips.phase(popper), Some(Phase::Shown));
        // Fallback timer was cancelled.
        assert_eq!(tips.tasks().pending_timers(), 0);
    }

    #[test]
    fn test_fallback_completes_hide() {
        let (mut tips, _) = runtime_with_button("Hi");
        let input = SettingsInput {
            duration: Some(Timing::Pair(0, 200)),
            ..SettingsInput::default()
        };
        let id = tips.create(".tip", input, Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        tips.show(popper);
        tips.tick();
        tips.hide(popper);
        assert_eq!(tips.phase(popper), Some(Phase::Leaving));
        assert!(tips.document().is_connected(popper));
        tips.advance(199);
        assert_eq!(tips.phase(popper), Some(Phase::Leaving));
        tips.advance(1);
        assert_eq!(tips.phase(popper), Some(Phase::Unmounted));
        assert!(!tips.document().is_connected(popper));
    }

    #[test]
    fn test_show_during_leave_keeps_popper_mounted() {
        let (mut tips, _) = runtime_with_button("Hi");
        let input = SettingsInput {
            duration: Some(Timing::Single(100)),
            ..SettingsInput::default()
        };
        let id = tips.create(".tip", input, Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        tips.show(popper);
        tips.run_timers();
        tips.hide(popper);
        tips.show(popper);
        tips.run_timers();
        assert_eq!(tips.phase(popper), Some(Phase::Shown));
        assert!(tips.document().is_connected(popper));
    }

    #[test]
    fn test_gate_detached_reference_destroys() {
        let (mut tips, button) = runtime_with_button("Hi");
        let id = tips.create(".tip", instant(), Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        tips.document_mut().detach(button);
        assert_eq!(tips.show_gate(popper), ShowGate::AbortAndDestroy);
        tips.show(popper);
        assert!(tips.registry().is_empty());
        assert_eq!(tips.document().get_attribute(button, "title"), Some("Hi"));
    }

    #[test]
    fn test_gate_unknown_popper_aborts() {
        let (tips, _) = runtime_with_button("Hi");
        assert_eq!(tips.show_gate(ElementId(999)), ShowGate::Abort);
    }

    #[test]
    fn test_open_false_fires_show_only() {
        let (mut tips, _) = runtime_with_button("Hi");
        let shows = Rc::new(Cell::new(0));
        let counter = Rc::clone(&shows);
        let input = SettingsInput {
            open: Some(false),
            ..instant()
        };
        let callbacks = Callbacks::new().on_show(move |_| counter.set(counter.get() + 1));
        let id = tips.create(".tip", input, callbacks).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        tips.show(popper);
        tips.show(popper);
        assert_eq!(shows.get(), 2);
        assert!(!tips.is_visible(popper));
        assert!(!tips.document().is_connected(popper));
    }

    #[test]
    fn test_destroy_restores_reference() {
        let (mut tips, button) = runtime_with_button("Hi");
        let id = tips.create(".tip", instant(), Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        tips.show(popper);
        tips.destroy(popper);
        let doc = tips.document();
        assert_eq!(doc.get_attribute(button, "title"), Some("Hi"));
        assert!(!doc.has_attribute(button, TOOLTIPPED_ATTR));
        assert!(!doc.has_attribute(button, ORIGINAL_TITLE_ATTR));
        assert!(!doc.is_connected(popper));
        assert!(tips.tasks().is_idle());
        assert!(tips.instance(id).unwrap().poppers().is_empty());
    }

    #[test]
    fn test_update_settings_redraws_in_place() {
        let mut doc = Document::new();
        let mut buttons = Vec::new();
        for title in ["a", "b", "c"] {
            let b = doc.create_element("button");
            doc.set_attribute(b, "title", title);
            doc.add_class(b, "tip");
            doc.append_child(doc.body(), b);
            buttons.push(b);
        }
        let mut tips = Tooltips::new(doc);
        let id = tips.create(".tip", instant(), Callbacks::new()).unwrap();
        let middle = tips.instance(id).unwrap().poppers()[1];

        let replacement = tips.update_settings(middle, Setting::Arrow(true)).unwrap();
        assert_ne!(replacement, middle);
        let order: Vec<ElementId> = tips.registry().iter().map(|r| r.reference).collect();
        assert_eq!(order, buttons);
        assert_eq!(tips.instance(id).unwrap().poppers()[1], replacement);
        assert!(tips.record(replacement).unwrap().popper.arrow.is_some());
        assert!(tips.instance(id).unwrap().settings().arrow);

        let same = tips.update_settings(replacement, Setting::Disabled(true));
        assert_eq!(same, Some(replacement));
    }

    #[test]
    fn test_update_settings_trigger_rebinds() {
        let (mut tips, _) = runtime_with_button("Hi");
        let id = tips.create(".tip", instant(), Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        let popper = tips
            .update_settings(popper, Setting::Trigger(Trigger::manual()))
            .unwrap();
        assert!(tips.record(popper).unwrap().listeners.is_empty());
    }

    #[test]
    fn test_update_refreshes_title() {
        let (mut tips, button) = runtime_with_button("First");
        let id = tips.create(".tip", instant(), Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        let content = tips.record(popper).unwrap().popper.content;

        tips.document_mut().set_attribute(button, "title", "Second");
        tips.update(popper);
        assert_eq!(tips.document().text(content), "Second");
        assert_eq!(tips.document().get_attribute(button, "title"), None);
        assert_eq!(
            tips.document().get_attribute(button, ORIGINAL_TITLE_ATTR),
            Some("Second")
        );
    }

    #[test]
    fn test_update_aborts_for_element_content() {
        let (mut tips, _) = runtime_with_button("x");
        let rich = tips.document_mut().create_element("section");
        tips.document_mut().set_inner(rich, "rich");
        let input = SettingsInput {
            html: Some(HtmlContent::Element(rich)),
            ..instant()
        };
        let id = tips.create(".tip", input, Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        let content = tips.record(popper).unwrap().popper.content;
        tips.update(popper);
        assert_eq!(tips.document().children(content), &[rich]);
    }

    #[test]
    fn test_hook_commands_apply_after_return() {
        let (mut tips, _) = runtime_with_button("Hi");
        let callbacks = Callbacks::new().on_shown(|ctx| ctx.hide());
        let id = tips.create(".tip", instant(), callbacks).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        tips.show(popper);
        tips.tick();
        assert_eq!(tips.phase(popper), Some(Phase::Unmounted));
    }

    #[test]
    fn test_content_mutation_repositions() {
        let (mut tips, _) = runtime_with_button("Hi");
        let id = tips.create(".tip", instant(), Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        let content = tips.record(popper).unwrap().popper.content;
        tips.show(popper);
        tips.tick();

        tips.document_mut().set_inner(content, "much longer content");
        tips.flush_mutations();
        assert_eq!(tips.document().style(popper, TRANSITION_DURATION), Some("0ms"));
        tips.tick();
        assert_eq!(tips.document().style(popper, TRANSITION_DURATION), Some("350ms"));
    }
}
