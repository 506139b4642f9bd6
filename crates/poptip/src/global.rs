//! Document-level behavior shared by every tooltip.
//!
//! Covers click-outside dismissal, the interactive mousemove watch, touch
//! input detection and scroll handling.

use crate::callbacks::HookKind;
use crate::engine::{PopperId, Tooltips};
use crate::factory::{CONTROLLER_ATTR, PLACEMENT_ATTR, POPPER_CLASS, TOOLTIPPED_ATTR};
use crate::settings::{HideOnClick, Position, Settings, Side, TriggerEvent};
use poptip_core::{Document, DomEvent, ElementId, EventKind, Point, Selector};

/// Two mousemoves closer than this mean a real mouse is in use.
const MOUSE_DETECTION_WINDOW_MS: u64 = 20;

/// Body class applied while touch input is active on iOS.
pub const TOUCH_CLASS: &str = "tippy-touch";

/// Input mode tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchState {
    /// Touch input was seen and no mouse has been detected since
    pub active: bool,
    /// Time of the previous mousemove while detecting
    pub last_mousemove: Option<u64>,
    /// Listening for mousemoves to switch back to mouse mode
    pub detecting: bool,
}

fn popper_selector() -> Selector {
    Selector::Class(POPPER_CLASS.to_string())
}

/// Whether `cursor` has left the area that keeps an interactive tooltip open.
///
/// The area is the popper rectangle grown by `interactiveBorder` on every
/// side, plus `distance` on the side facing the reference so the cursor can
/// cross the gap. A popper that was never placed counts as outside.
#[must_use]
pub fn cursor_outside_interactive_border(
    doc: &Document,
    popper: ElementId,
    settings: &Settings,
    cursor: Point,
) -> bool {
    let Some(position) = doc
        .get_attribute(popper, PLACEMENT_ATTR)
        .and_then(|p| p.parse::<Position>().ok())
    else {
        return true;
    };
    let rect = doc.rect(popper);
    let border = settings.interactive_border;
    let facing = position.side().opposite();
    let allowance = |side: Side| {
        if side == facing {
            border + settings.distance
        } else {
            border
        }
    };

    rect.top() - cursor.y > allowance(Side::Top)
        || cursor.y - rect.bottom() > allowance(Side::Bottom)
        || rect.left() - cursor.x > allowance(Side::Left)
        || cursor.x - rect.right() > allowance(Side::Right)
}

impl Tooltips {
    /// Current input mode.
    #[must_use]
    pub const fn touch(&self) -> &TouchState {
        &self.touch
    }

    pub(crate) fn handle_document_event(&mut self, event: &DomEvent) {
        match event.kind {
            EventKind::Click => self.handle_document_click(event.target),
            EventKind::MouseMove => {
                self.check_watches(event);
                self.detect_mouse();
            }
            EventKind::Scroll => {
                let watching: Vec<PopperId> = self
                    .registry
                    .iter()
                    .filter(|r| r.watch.is_some_and(|w| w.hide_on_scroll))
                    .map(|r| r.popper_id())
                    .collect();
                for popper in watching {
                    self.end_watch(popper);
                }
                self.reposition();
            }
            EventKind::TouchStart => self.handle_touch_start(),
            EventKind::MouseLeave if event.target == self.document.body() => {
                let watching: Vec<PopperId> = self
                    .registry
                    .iter()
                    .filter(|r| r.watch.is_some())
                    .map(|r| r.popper_id())
                    .collect();
                for popper in watching {
                    self.end_watch(popper);
                }
            }
            _ => {}
        }
    }

    fn handle_document_click(&mut self, target: ElementId) {
        if let Some(popper) = self.document.closest(target, &popper_selector()) {
            match self.registry.by_popper(popper) {
                None => return,
                Some(record) if record.settings.interactive => return,
                Some(_) => {}
            }
        }

        let tooltipped = Selector::attribute(TOOLTIPPED_ATTR);
        if let Some(reference) = self.document.closest(target, &tooltipped) {
            let Some(record) = self.registry.by_reference(reference) else {
                return;
            };
            let settings = &record.settings;
            let click_triggered = settings.trigger.contains(TriggerEvent::Click);
            if !settings.multiple && (self.touch.active || click_triggered) {
                let keep = record.popper_id();
                self.hide_all(Some(keep));
                return;
            }
            if settings.hide_on_click != HideOnClick::Enabled || click_triggered {
                return;
            }
        }

        let in_controller = self
            .document
            .closest(target, &Selector::attribute(CONTROLLER_ATTR))
            .is_some();
        if in_controller || self.document.query_selector(&popper_selector()).is_none() {
            return;
        }
        self.hide_all(None);
    }

    /// Hide every mounted tooltip that allows click dismissal, except `exclude`.
    ///
    /// Each fires its `onRequestClose` callback first.
    pub fn hide_all(&mut self, exclude: Option<PopperId>) {
        let targets: Vec<PopperId> = self
            .registry
            .iter()
            .filter(|r| {
                let container = r.settings.append_to.container(&self.document);
                let dismissable = r.settings.hide_on_click == HideOnClick::Enabled
                    || r.settings.trigger.contains(TriggerEvent::Focus);
                self.document.contains(container, r.popper_id())
                    && dismissable
                    && exclude != Some(r.popper_id())
            })
            .map(|r| r.popper_id())
            .collect();

        if !targets.is_empty() {
            tracing::debug!(count = targets.len(), ?exclude, "hiding all tooltips");
        }
        for popper in targets {
            self.fire(popper, HookKind::RequestClose);
            self.cancel_delays(popper);
            self.hide_now(popper, None, false);
        }
        self.flush_mutations();
    }

    fn check_watches(&mut self, event: &DomEvent) {
        let watching: Vec<PopperId> = self
            .registry
            .iter()
            .filter(|r| r.watch.is_some())
            .map(|r| r.popper_id())
            .collect();
        for popper in watching {
            if !self.watch_keeps_open(popper, event) {
                self.end_watch(popper);
            }
        }
    }

    fn watch_keeps_open(&self, popper: PopperId, event: &DomEvent) -> bool {
        let Some(record) = self.registry.by_popper(popper) else {
            return false;
        };
        let target = event.target;
        let tooltipped = self
            .document
            .closest(target, &Selector::attribute(TOOLTIPPED_ATTR));
        if tooltipped.is_some_and(|el| el != record.reference) {
            return false;
        }
        let over_popper = self.document.closest(target, &popper_selector()) == Some(popper);
        let over_reference = tooltipped == Some(record.reference);
        if over_popper || over_reference || record.settings.trigger.contains(TriggerEvent::Click) {
            return true;
        }
        !cursor_outside_interactive_border(&self.document, popper, &record.settings, event.position)
    }

    fn end_watch(&mut self, popper: PopperId) {
        if let Some(record) = self.registry.by_popper_mut(popper) {
            record.watch = None;
        }
        tracing::trace!(?popper, "interactive watch ended");
        self.schedule_hide(popper);
    }

    fn detect_mouse(&mut self) {
        if !self.touch.detecting {
            return;
        }
        let now = self.tasks.now();
        let rapid = self
            .touch
            .last_mousemove
            .is_some_and(|last| now.saturating_sub(last) < MOUSE_DETECTION_WINDOW_MS);
        if rapid {
            self.touch.active = false;
            self.touch.detecting = false;
            if !self.env.ios {
                let body = self.document.body();
                self.document.remove_class(body, TOUCH_CLASS);
            }
            tracing::debug!("mouse detected; leaving touch mode");
        }
        self.touch.last_mousemove = Some(now);
    }

    fn handle_touch_start(&mut self) {
        if !self.touch.active {
            tracing::debug!("touch input detected");
        }
        self.touch.active = true;
        if self.env.ios {
            let body = self.document.body();
            self.document.add_class(body, TOUCH_CLASS);
        }
        if self.env.dynamic_input_detection {
            self.touch.detecting = true;
        }
    }

    /// The host window lost focus.
    ///
    /// A focused reference element is blurred so its tooltip does not
    /// reopen on return; the blur carries no related target.
    pub fn window_blur(&mut self) {
        let Some(active) = self.document.active_element() else {
            return;
        };
        if !self.document.has_attribute(active, TOOLTIPPED_ATTR) {
            return;
        }
        self.document.blur();
        self.dispatch(&DomEvent::new(EventKind::Blur, active));
        self.dispatch(&DomEvent::new(EventKind::FocusOut, active));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::Callbacks;
    use crate::config::Environment;
    use crate::settings::{SettingsInput, Timing};
    use poptip_core::Rect;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn button(doc: &mut Document, x: f32) -> ElementId {
        let b = doc.create_element("button");
        doc.set_attribute(b, "title", "Tip");
        doc.set_rect(b, Rect::new(x, 300.0, 60.0, 20.0));
        doc.append_child(doc.body(), b);
        b
    }

    fn instant(input: SettingsInput) -> SettingsInput {
        SettingsInput {
            duration: Some(Timing::Single(0)),
            ..input
        }
    }

    fn shown(tips: &mut Tooltips, reference: ElementId, input: SettingsInput) -> PopperId {
        let id = tips.create(reference, instant(input), Callbacks::new()).unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        tips.show(popper);
        tips.tick();
        popper
    }

    #[test]
    fn test_click_outside_hides_everything() {
        let mut doc = Document::new();
        let (a, b) = (button(&mut doc, 100.0), button(&mut doc, 400.0));
        let mut tips = Tooltips::new(doc);
        let pa = shown(&mut tips, a, SettingsInput::default());
        let pb = shown(&mut tips, b, SettingsInput::default());

        let body = tips.document().body();
        tips.dispatch(&DomEvent::new(EventKind::Click, body));
        assert!(!tips.is_visible(pa));
        assert!(!tips.is_visible(pb));
    }

    #[test]
    fn test_click_inside_interactive_popper_is_ignored() {
        let mut doc = Document::new();
        let a = button(&mut doc, 100.0);
        let mut tips = Tooltips::new(doc);
        let popper = shown(
            &mut tips,
            a,
            SettingsInput {
                interactive: Some(true),
                ..SettingsInput::default()
            },
        );
        let content = tips.record(popper).unwrap().popper.content;
        tips.dispatch(&DomEvent::new(EventKind::Click, content));
        assert!(tips.is_visible(popper));
    }

    #[test]
    fn test_click_inside_plain_popper_hides() {
        let mut doc = Document::new();
        let a = button(&mut doc, 100.0);
        let mut tips = Tooltips::new(doc);
        let popper = shown(&mut tips, a, SettingsInput::default());
        let content = tips.record(popper).unwrap().popper.content;
        tips.dispatch(&DomEvent::new(EventKind::Click, content));
        assert!(!tips.is_visible(popper));
    }

    #[test]
    fn test_click_on_controller_is_ignored() {
        let mut doc = Document::new();
        let a = button(&mut doc, 100.0);
        let controller = doc.create_element("div");
        doc.set_attribute(controller, CONTROLLER_ATTR, "");
        doc.append_child(doc.body(), controller);
        let mut tips = Tooltips::new(doc);
        let popper = shown(&mut tips, a, SettingsInput::default());
        tips.dispatch(&DomEvent::new(EventKind::Click, controller));
        assert!(tips.is_visible(popper));
    }

    #[test]
    fn test_click_on_reference_respects_hide_on_click() {
        let mut doc = Document::new();
        let (a, b) = (button(&mut doc, 100.0), button(&mut doc, 400.0));
        let mut tips = Tooltips::new(doc);
        let pa = shown(&mut tips, a, SettingsInput::default());
        let pb = shown(
            &mut tips,
            b,
            SettingsInput {
                hide_on_click: Some(HideOnClick::Disabled),
                ..SettingsInput::default()
            },
        );
        // Mouse mode, hover-triggered: a click on b with hideOnClick=false hides nothing.
        tips.dispatch(&DomEvent::new(EventKind::Click, b));
        assert!(tips.is_visible(pa));
        assert!(tips.is_visible(pb));
    }

    #[test]
    fn test_request_close_fires_before_hide() {
        let mut doc = Document::new();
        let a = button(&mut doc, 100.0);
        let mut tips = Tooltips::new(doc);
        let asked = Rc::new(Cell::new(0));
        let counter = Rc::clone(&asked);
        let id = tips
            .create(
                a,
                instant(SettingsInput::default()),
                Callbacks::new().on_request_close(move |_| counter.set(counter.get() + 1)),
            )
            .unwrap();
        let popper = tips.instance(id).unwrap().poppers()[0];
        tips.show(popper);
        tips.hide_all(None);
        assert_eq!(asked.get(), 1);
        assert!(!tips.is_visible(popper));
    }

    #[test]
    fn test_touch_detection_round_trip() {
        let mut tips = Tooltips::new(Document::new()).with_environment(Environment::touch());
        let body = tips.document().body();
        tips.dispatch(&DomEvent::new(EventKind::TouchStart, body));
        assert!(tips.touch().active);
        assert!(tips.touch().detecting);

        tips.dispatch(&DomEvent::new(EventKind::MouseMove, body));
        assert!(tips.touch().active);
        tips.advance(5);
        tips.dispatch(&DomEvent::new(EventKind::MouseMove, body));
        assert!(!tips.touch().active);
        assert!(!tips.touch().detecting);
    }

    #[test]
    fn test_ios_touch_class() {
        let mut tips = Tooltips::new(Document::new()).with_environment(Environment::ios());
        let body = tips.document().body();
        tips.dispatch(&DomEvent::new(EventKind::TouchStart, body));
        assert!(tips.document().has_class(body, TOUCH_CLASS));
    }

    #[test]
    fn test_interactive_watch_hides_when_cursor_leaves_border() {
        let mut doc = Document::new();
        let a = button(&mut doc, 400.0);
        let mut tips = Tooltips::new(doc);
        let popper = shown(
            &mut tips,
            a,
            SettingsInput {
                interactive: Some(true),
                ..SettingsInput::default()
            },
        );
        tips.dispatch(&DomEvent::new(EventKind::MouseLeave, a));
        assert!(tips.is_visible(popper));

        let rect = tips.document().rect(popper);
        let body = tips.document().body();
        let near = Point::new(rect.right() + 1.0, rect.y);
        tips.dispatch(&DomEvent::new(EventKind::MouseMove, body).at(near));
        assert!(tips.is_visible(popper));

        let far = Point::new(rect.right() + 50.0, rect.y);
        tips.dispatch(&DomEvent::new(EventKind::MouseMove, body).at(far));
        assert!(!tips.is_visible(popper));
        assert!(tips.record(popper).unwrap().watch.is_none());
    }

    #[test]
    fn test_interactive_watch_other_reference_hides() {
        let mut doc = Document::new();
        let (a, b) = (button(&mut doc, 100.0), button(&mut doc, 400.0));
        let mut tips = Tooltips::new(doc);
        let interactive = SettingsInput {
            interactive: Some(true),
            ..SettingsInput::default()
        };
        let pa = shown(&mut tips, a, interactive);
        tips.create(b, SettingsInput::default(), Callbacks::new()).unwrap();
        tips.dispatch(&DomEvent::new(EventKind::MouseLeave, a));
        tips.dispatch(&DomEvent::new(EventKind::MouseMove, b));
        assert!(!tips.is_visible(pa));
    }

    #[test]
    fn test_border_extends_toward_reference() {
        let mut doc = Document::new();
        let popper = doc.create_element("div");
        doc.set_rect(popper, Rect::new(100.0, 100.0, 50.0, 20.0));
        let settings = Settings::default();
        assert!(cursor_outside_interactive_border(&doc, popper, &settings, Point::new(0.0, 0.0)));

        doc.set_attribute(popper, PLACEMENT_ATTR, "top");
        // Below the popper, toward the reference: border 2 + distance 10.
        assert!(!cursor_outside_interactive_border(&doc, popper, &settings, Point::new(120.0, 131.0)));
        assert!(cursor_outside_interactive_border(&doc, popper, &settings, Point::new(120.0, 133.0)));
        // Above, away from it: border only.
        assert!(!cursor_outside_interactive_border(&doc, popper, &settings, Point::new(120.0, 98.5)));
        assert!(cursor_outside_interactive_border(&doc, popper, &settings, Point::new(120.0, 97.0)));
    }

    #[test]
    fn test_window_blur_blurs_reference() {
        let mut doc = Document::new();
        let a = button(&mut doc, 100.0);
        let mut tips = Tooltips::new(doc);
        let popper = shown(&mut tips, a, SettingsInput::default());
        tips.document_mut().focus(a);
        tips.window_blur();
        assert_eq!(tips.document().active_element(), None);
        // Blur without a related target never hides.
        assert!(tips.is_visible(popper));
    }

    proptest! {
        #[test]
        fn prop_inside_popper_is_never_outside(
            x in 0.0f32..50.0,
            y in 0.0f32..20.0,
            index in 0usize..12,
        ) {
            let mut doc = Document::new();
            let popper = doc.create_element("div");
            doc.set_rect(popper, Rect::new(100.0, 100.0, 50.0, 20.0));
            doc.set_attribute(popper, PLACEMENT_ATTR, Position::ALL[index].name());
            let cursor = Point::new(100.0 + x, 100.0 + y);
            prop_assert!(!cursor_outside_interactive_border(&doc, popper, &Settings::default(), cursor));
        }
    }
}
