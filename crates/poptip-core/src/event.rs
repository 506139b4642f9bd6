//! Input events dispatched into the document.

use crate::dom::ElementId;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// DOM event types the tooltip engine listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Pointer entered the element
    MouseEnter,
    /// Pointer left the element
    MouseLeave,
    /// Pointer moved
    MouseMove,
    /// Primary button click
    Click,
    /// Element gained focus (does not bubble)
    Focus,
    /// Element lost focus (does not bubble)
    Blur,
    /// Element or descendant gained focus
    FocusIn,
    /// Element or descendant lost focus
    FocusOut,
    /// Touch started
    TouchStart,
    /// Touch ended
    TouchEnd,
    /// Document scrolled
    Scroll,
}

impl EventKind {
    /// DOM event name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::MouseMove => "mousemove",
            Self::Click => "click",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::Scroll => "scroll",
        }
    }

    /// Parse a DOM event name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "mouseenter" => Self::MouseEnter,
            "mouseleave" => Self::MouseLeave,
            "mousemove" => Self::MouseMove,
            "click" => Self::Click,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "focusin" => Self::FocusIn,
            "focusout" => Self::FocusOut,
            "touchstart" => Self::TouchStart,
            "touchend" => Self::TouchEnd,
            "scroll" => Self::Scroll,
            _ => return None,
        })
    }

    /// Whether events of this kind bubble by default.
    #[must_use]
    pub const fn bubbles_by_default(self) -> bool {
        !matches!(
            self,
            Self::MouseEnter | Self::MouseLeave | Self::Focus | Self::Blur
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An input event targeted at an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomEvent {
    /// Event type
    pub kind: EventKind,
    /// Element the event was dispatched to
    pub target: ElementId,
    /// Secondary target (the element gaining focus for blur/focusout)
    pub related_target: Option<ElementId>,
    /// Pointer position in page coordinates
    pub position: Point,
    /// Whether the event propagates to ancestors
    pub bubbles: bool,
}

impl DomEvent {
    /// Create an event with the kind's default bubbling behavior.
    #[must_use]
    pub const fn new(kind: EventKind, target: ElementId) -> Self {
        Self {
            kind,
            target,
            related_target: None,
            position: Point::ORIGIN,
            bubbles: kind.bubbles_by_default(),
        }
    }

    /// Set the pointer position.
    #[must_use]
    pub const fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Set the related target.
    #[must_use]
    pub const fn related(mut self, related_target: ElementId) -> Self {
        self.related_target = Some(related_target);
        self
    }

    /// Override bubbling.
    #[must_use]
    pub const fn bubbling(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }
}
