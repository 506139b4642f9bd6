//! Reference element listener sets.
//!
//! Listeners are data: each binds an [`EventKind`] on the reference element to
//! one of the three derived behaviors. The engine dispatches events against a
//! record's list, so rebuilding the list is the same as rebinding.

use crate::config::Environment;
use crate::settings::{Trigger, TriggerEvent};
use poptip_core::EventKind;

/// Behavior a listener runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Schedule show (or toggle off on click)
    Trigger,
    /// Schedule hide, or start the interactive watch
    Leave,
    /// Hide on focus loss
    Blur,
}

/// An event bound on a reference element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Listener {
    /// Event type
    pub event: EventKind,
    /// Behavior
    pub handler: Handler,
}

impl Listener {
    /// Create a listener.
    #[must_use]
    pub const fn new(event: EventKind, handler: Handler) -> Self {
        Self { event, handler }
    }
}

/// Listeners implied by one trigger word.
#[must_use]
pub fn listeners_for_event(event: TriggerEvent, touch_hold: bool, env: &Environment) -> Vec<Listener> {
    match event {
        TriggerEvent::Manual => Vec::new(),
        TriggerEvent::Click => vec![Listener::new(EventKind::Click, Handler::Trigger)],
        TriggerEvent::MouseEnter => {
            let mut out = vec![Listener::new(EventKind::MouseEnter, Handler::Trigger)];
            if env.supports_touch && touch_hold {
                out.push(Listener::new(EventKind::TouchStart, Handler::Trigger));
                out.push(Listener::new(EventKind::TouchEnd, Handler::Leave));
            }
            out.push(Listener::new(EventKind::MouseLeave, Handler::Leave));
            out
        }
        TriggerEvent::Focus => vec![
            Listener::new(EventKind::Focus, Handler::Trigger),
            Listener::new(EventKind::Blur, Handler::Blur),
        ],
        TriggerEvent::FocusIn => vec![
            Listener::new(EventKind::FocusIn, Handler::Trigger),
            Listener::new(EventKind::FocusOut, Handler::Blur),
        ],
    }
}

/// Listeners implied by a whole trigger list, in trigger order.
#[must_use]
pub fn listeners_for(trigger: &Trigger, touch_hold: bool, env: &Environment) -> Vec<Listener> {
    trigger
        .events()
        .iter()
        .flat_map(|event| listeners_for_event(*event, touch_hold, env))
        .collect()
}
