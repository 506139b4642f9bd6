//! Event dispatch onto reference listeners.

use crate::engine::{PopperId, Tooltips};
use crate::factory::POPPER_CLASS;
use crate::listeners::Handler;
use crate::record::InteractiveWatch;
use crate::settings::HideOnClick;
use poptip_core::{DomEvent, ElementId, EventKind, Selector};

impl Tooltips {
    /// Deliver an input event.
    ///
    /// Reference listeners run first, for the target and then (if the event
    /// bubbles) each ancestor. Document-level behavior runs last.
    pub fn dispatch(&mut self, event: &DomEvent) {
        tracing::trace!(kind = %event.kind, target = ?event.target, "dispatch");
        for node in self.event_path(event) {
            let bound: Vec<(PopperId, Handler)> = self
                .registry
                .iter()
                .filter(|r| r.reference == node)
                .flat_map(|r| {
                    r.listeners
                        .iter()
                        .filter(|l| l.event == event.kind)
                        .map(move |l| (r.popper_id(), l.handler))
                })
                .collect();
            for (popper, handler) in bound {
                match handler {
                    Handler::Trigger => self.handle_trigger(popper, event),
                    Handler::Leave => self.handle_leave(popper, event),
                    Handler::Blur => self.handle_blur(popper, event),
                }
            }

            if event.kind == EventKind::MouseMove {
                let following: Vec<PopperId> = self
                    .registry
                    .iter()
                    .filter(|r| r.reference == node && r.follow_cursor_bound)
                    .map(|r| r.popper_id())
                    .collect();
                for popper in following {
                    self.follow_cursor(popper, event.position);
                }
            }
        }
        self.handle_document_event(event);
        self.flush_mutations();
    }

    fn event_path(&self, event: &DomEvent) -> Vec<ElementId> {
        let mut path = vec![event.target];
        if event.bubbles {
            let mut current = self.document.parent(event.target);
            while let Some(node) = current {
                path.push(node);
                current = self.document.parent(node);
            }
        }
        path
    }

    fn handle_trigger(&mut self, popper: PopperId, event: &DomEvent) {
        let Some(record) = self.registry.by_popper(popper) else {
            return;
        };
        let mouseenter_touch =
            event.kind == EventKind::MouseEnter && self.env.supports_touch && self.touch.active;
        // Touch-hold tooltips ignore the emulated mouseenter that follows a tap.
        if mouseenter_touch && record.settings.touch_hold {
            return;
        }

        let reference = record.reference;
        let toggles_off = event.kind == EventKind::Click
            && record.is_visible()
            && record.settings.hide_on_click != HideOnClick::Persistent;
        if toggles_off {
            self.schedule_hide(popper);
        } else if self.has_wait(popper) {
            self.fire_wait(popper, event);
        } else {
            self.schedule_show(popper);
        }

        // iOS only delivers clicks to elements with a click listener; emulate one.
        if mouseenter_touch && self.env.ios {
            self.dispatch(&DomEvent::new(EventKind::Click, reference));
        }
    }

    fn handle_leave(&mut self, popper: PopperId, event: &DomEvent) {
        let Some(record) = self.registry.by_popper(popper) else {
            return;
        };
        let settings = &record.settings;
        let touch_leave =
            event.kind == EventKind::MouseLeave && self.env.supports_touch && self.touch.active;
        if touch_leave && settings.touch_hold {
            return;
        }
        if settings.interactive {
            let watch = InteractiveWatch {
                hide_on_scroll: settings.hide_on_scroll,
            };
            if let Some(record) = self.registry.by_popper_mut(popper) {
                record.watch = Some(watch);
            }
            tracing::trace!(?popper, "watching interactive tooltip");
            return;
        }
        self.schedule_hide(popper);
    }

    fn handle_blur(&mut self, popper: PopperId, event: &DomEvent) {
        let Some(related) = event.related_target else {
            return;
        };
        if self.touch.active {
            return;
        }
        let popper_class = Selector::Class(POPPER_CLASS.to_string());
        if self.document.closest(related, &popper_class).is_some() {
            return;
        }
        self.schedule_hide(popper);
    }
}
