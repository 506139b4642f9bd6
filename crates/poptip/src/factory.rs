//! Popper element factory.
//!
//! Builds the floating subtree for one record:
//!
//! ```text
//! div.tippy-popper[role=tooltip]
//! └── div.tippy-tooltip.tippy-tooltip--{size}.leave
//!     ├── div.arrow-{size}[data-popper-arrow]     (arrow)
//!     ├── div.leave[data-popper-circle]           (animateFill)
//!     └── div.tippy-tooltip-content
//! ```
//!
//! Nothing is attached to the document here; the engine mounts the popper on show.

use crate::settings::{HtmlContent, Settings};
use poptip_core::{Document, ElementId};

/// Class of the outer popper container.
pub const POPPER_CLASS: &str = "tippy-popper";
/// Class of the tooltip box.
pub const TOOLTIP_CLASS: &str = "tippy-tooltip";
/// Class of the content slot.
pub const CONTENT_CLASS: &str = "tippy-tooltip-content";
/// Marker attribute of the arrow element.
pub const ARROW_ATTR: &str = "data-popper-arrow";
/// Marker attribute of the fill circle.
pub const CIRCLE_ATTR: &str = "data-popper-circle";
/// Marker attribute of every managed reference element.
pub const TOOLTIPPED_ATTR: &str = "data-tooltipped";
/// Marker attribute of elements whose clicks never dismiss tooltips.
pub const CONTROLLER_ATTR: &str = "data-tippy-controller";
/// Attribute holding the solved placement on the popper.
pub const PLACEMENT_ATTR: &str = "x-placement";
/// Attribute holding the reference's title while the tooltip owns it.
pub const ORIGINAL_TITLE_ATTR: &str = "data-original-title";
/// Transition duration style property.
pub const TRANSITION_DURATION: &str = "transition-duration";

const HTML_TEMPLATE_FALLBACK_ID: &str = "tippy-html-template";

/// Handles to the parts of a popper subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopperElement {
    /// Outer container, mounted into `appendTo`
    pub popper: ElementId,
    /// Tooltip box
    pub tooltip: ElementId,
    /// Content slot
    pub content: ElementId,
    /// Arrow, when `arrow` is set
    pub arrow: Option<ElementId>,
    /// Fill circle, when `animateFill` is set
    pub circle: Option<ElementId>,
}

impl PopperElement {
    /// Tooltip box and fill circle, the elements that animate.
    pub fn animated(&self) -> impl Iterator<Item = ElementId> {
        std::iter::once(self.tooltip).chain(self.circle)
    }
}

/// Inline offset of the tooltip box from its placement edge.
///
/// The stylesheet already accounts for the default distance of 10px, so the
/// inline value only corrects for the difference.
#[must_use]
pub fn offset_distance_px(distance: f32) -> String {
    let value = -(distance - 10.0);
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}px")
}

/// Popper `id` attribute for a record id.
#[must_use]
pub fn popper_dom_id(id: u64) -> String {
    format!("tippy-tooltip-{id}")
}

/// Build the popper subtree for record `id`.
pub fn create_popper(doc: &mut Document, id: u64, title: &str, settings: &Settings) -> PopperElement {
    let popper = doc.create_element("div");
    doc.add_class(popper, POPPER_CLASS);
    doc.set_attribute(popper, "role", "tooltip");
    doc.set_attribute(popper, "aria-hidden", "true");
    doc.set_attribute(popper, "id", &popper_dom_id(id));
    doc.set_style(popper, "visibility", "hidden");
    doc.set_style(popper, "z-index", &settings.z_index.to_string());

    let tooltip = doc.create_element("div");
    doc.add_class(tooltip, TOOLTIP_CLASS);
    doc.add_class(tooltip, &format!("{TOOLTIP_CLASS}--{}", settings.size.name()));
    doc.add_class(tooltip, "leave");
    doc.set_attribute(tooltip, "data-animation", settings.animation.name());
    for theme in settings.themes() {
        doc.add_class(tooltip, &format!("{theme}-theme"));
    }

    let arrow = settings.arrow.then(|| {
        let arrow = doc.create_element("div");
        doc.add_class(arrow, &format!("arrow-{}", settings.arrow_size.name()));
        doc.set_attribute(arrow, ARROW_ATTR, "");
        doc.append_child(tooltip, arrow);
        arrow
    });

    let circle = settings.animate_fill.then(|| {
        doc.set_attribute(tooltip, "data-animatefill", "");
        let circle = doc.create_element("div");
        doc.add_class(circle, "leave");
        doc.set_attribute(circle, CIRCLE_ATTR, "");
        doc.append_child(tooltip, circle);
        circle
    });

    if settings.inertia {
        doc.set_attribute(tooltip, "data-inertia", "");
    }
    if settings.interactive {
        doc.set_attribute(tooltip, "data-interactive", "");
    }

    let content = doc.create_element("div");
    doc.add_class(content, CONTENT_CLASS);

    if let Some(html) = &settings.html {
        let template_id = match html {
            HtmlContent::Element(el) => {
                doc.append_child(content, *el);
                doc.get_attribute(*el, "id")
                    .filter(|id| !id.is_empty())
                    .map_or_else(|| HTML_TEMPLATE_FALLBACK_ID.to_string(), |id| format!("#{id}"))
            }
            HtmlContent::Template(selector) => {
                copy_template(doc, selector, content);
                selector.clone()
            }
        };
        doc.add_class(popper, "html-template");
        if settings.interactive {
            doc.set_attribute(popper, "tabindex", "-1");
        }
        doc.set_attribute(tooltip, "data-template-id", &template_id);
    } else {
        doc.set_inner(content, title);
    }

    // Rough first paint; the placement hook refines it on mount.
    doc.set_style(
        tooltip,
        settings.position.side().name(),
        &offset_distance_px(settings.distance),
    );

    doc.append_child(tooltip, content);
    doc.append_child(popper, tooltip);

    PopperElement {
        popper,
        tooltip,
        content,
        arrow,
        circle,
    }
}

/// Element a template selector refers to.
#[must_use]
pub fn find_template(doc: &Document, selector: &str) -> Option<ElementId> {
    doc.get_element_by_id(selector.trim().trim_start_matches('#'))
}

/// Copy the template's content into `content`. Returns `false` if the template is gone.
pub fn copy_template(doc: &mut Document, selector: &str, content: ElementId) -> bool {
    match find_template(doc, selector) {
        Some(template) => {
            doc.copy_inner(template, content);
            true
        }
        None => {
            tracing::warn!(selector, "html template not found; content left empty");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Position, TooltipSize};

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_default_structure() {
        let mut doc = Document::new();
        let p = create_popper(&mut doc, 1, "Hello", &settings());

        assert!(doc.has_class(p.popper, POPPER_CLASS));
        assert_eq!(doc.get_attribute(p.popper, "role"), Some("tooltip"));
        assert_eq!(doc.get_attribute(p.popper, "aria-hidden"), Some("true"));
        assert_eq!(doc.get_attribute(p.popper, "id"), Some("tippy-tooltip-1"));
        assert_eq!(doc.style(p.popper, "z-index"), Some("9999"));
        assert!(!doc.is_connected(p.popper));

        assert_eq!(doc.children(p.popper), &[p.tooltip]);
        assert!(doc.has_class(p.tooltip, "tippy-tooltip--regular"));
        assert!(doc.has_class(p.tooltip, "leave"));
        assert!(doc.has_class(p.tooltip, "dark-theme"));
        assert_eq!(doc.get_attribute(p.tooltip, "data-animation"), Some("shift"));
        assert_eq!(doc.text(p.content), "Hello");
        assert!(p.arrow.is_none());
        assert!(p.circle.is_some());
        assert!(doc.has_attribute(p.tooltip, "data-animatefill"));
    }

    #[test]
    fn test_arrow_without_circle() {
        let mut doc = Document::new();
        let s = Settings {
            arrow: true,
            animate_fill: false,
            arrow_size: TooltipSize::Big,
            ..settings()
        };
        let p = create_popper(&mut doc, 2, "x", &s);
        let arrow = p.arrow.unwrap();
        assert!(doc.has_class(arrow, "arrow-big"));
        assert!(doc.has_attribute(arrow, ARROW_ATTR));
        assert!(p.circle.is_none());
        assert!(!doc.has_attribute(p.tooltip, "data-animatefill"));
    }

    #[test]
    fn test_themes_and_flags() {
        let mut doc = Document::new();
        let s = Settings {
            theme: "light bordered".to_string(),
            inertia: true,
            interactive: true,
            ..settings()
        };
        let p = create_popper(&mut doc, 3, "x", &s);
        assert!(doc.has_class(p.tooltip, "light-theme"));
        assert!(doc.has_class(p.tooltip, "bordered-theme"));
        assert!(doc.has_attribute(p.tooltip, "data-inertia"));
        assert!(doc.has_attribute(p.tooltip, "data-interactive"));
    }

    #[test]
    fn test_initial_offset_style() {
        let mut doc = Document::new();
        let s = Settings {
            position: Position::Left,
            distance: 15.0,
            ..settings()
        };
        let p = create_popper(&mut doc, 4, "x", &s);
        assert_eq!(doc.style(p.tooltip, "left"), Some("-5px"));
        assert_eq!(offset_distance_px(10.0), "0px");
        assert_eq!(offset_distance_px(5.0), "5px");
    }

    #[test]
    fn test_template_content() {
        let mut doc = Document::new();
        let template = doc.create_element("div");
        doc.set_attribute(template, "id", "tpl");
        doc.set_inner(template, "<b>Rich</b>");
        doc.append_child(doc.body(), template);

        let s = Settings {
            html: Some(HtmlContent::Template("#tpl".to_string())),
            interactive: true,
            ..settings()
        };
        let p = create_popper(&mut doc, 5, "ignored", &s);
        assert_eq!(doc.text(p.content), "<b>Rich</b>");
        assert!(doc.has_class(p.popper, "html-template"));
        assert_eq!(doc.get_attribute(p.popper, "tabindex"), Some("-1"));
        assert_eq!(doc.get_attribute(p.tooltip, "data-template-id"), Some("#tpl"));
    }

    #[test]
    fn test_element_content_is_moved() {
        let mut doc = Document::new();
        let rich = doc.create_element("section");
        doc.append_child(doc.body(), rich);

        let s = Settings {
            html: Some(HtmlContent::Element(rich)),
            ..settings()
        };
        let p = create_popper(&mut doc, 6, "", &s);
        assert_eq!(doc.parent(rich), Some(p.content));
        assert_eq!(
            doc.get_attribute(p.tooltip, "data-template-id"),
            Some("tippy-html-template")
        );
    }

    #[test]
    fn test_missing_template_leaves_content_empty() {
        let mut doc = Document::new();
        let s = Settings {
            html: Some(HtmlContent::Template("#gone".to_string())),
            ..settings()
        };
        let p = create_popper(&mut doc, 7, "title", &s);
        assert_eq!(doc.text(p.content), "");
    }
}
