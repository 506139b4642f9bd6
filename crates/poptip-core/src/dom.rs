//! Headless document model.
//!
//! [`Document`] is an arena of elements standing in for the browser DOM. The
//! host owns layout, so element rectangles are reported into the document
//! with [`Document::set_rect`]; everything else (attributes, classes, inline
//! style, tree structure, focus) behaves like its DOM counterpart.
//!
//! Child-list and text mutations inside observed subtrees are recorded, so
//! callers can emulate a `MutationObserver` with [`Document::observe`] and
//! [`Document::take_mutations`].

use crate::geometry::Rect;
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Element identifier (index into the document arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Arena index of this element.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a subtree observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    rect: Rect,
}

#[derive(Debug, Clone)]
struct Observer {
    id: ObserverId,
    target: ElementId,
    pending: bool,
}

/// HTML-like document.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
    body: ElementId,
    active: Option<ElementId>,
    viewport: Rect,
    observers: Vec<Observer>,
    next_observer: u64,
}

impl Document {
    /// Create a document with an `html` root and a `body`.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            elements: Vec::new(),
            root: ElementId(0),
            body: ElementId(0),
            active: None,
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            observers: Vec::new(),
            next_observer: 0,
        };
        let root = doc.create_element("html");
        let body = doc.create_element("body");
        doc.append_child(root, body);
        doc.root = root;
        doc.body = body;
        doc.set_rect(body, doc.viewport);
        doc
    }

    /// Get the `html` element.
    #[must_use]
    pub const fn root(&self) -> ElementId {
        self.root
    }

    /// Get the `body` element.
    #[must_use]
    pub const fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(u32::try_from(self.elements.len()).unwrap_or(u32::MAX));
        self.elements.push(Element {
            tag: tag.to_ascii_lowercase(),
            ..Element::default()
        });
        id
    }

    fn node(&self, el: ElementId) -> Option<&Element> {
        self.elements.get(el.index())
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(el.index())
    }

    /// Tag name of an element.
    #[must_use]
    pub fn tag(&self, el: ElementId) -> Option<&str> {
        self.node(el).map(|n| n.tag.as_str())
    }

    // === Tree ===

    /// Parent of an element.
    #[must_use]
    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el).and_then(|n| n.parent)
    }

    /// Children of an element, in order.
    #[must_use]
    pub fn children(&self, el: ElementId) -> &[ElementId] {
        self.node(el).map_or(&[], |n| n.children.as_slice())
    }

    /// Append `child` to `parent`, moving it from its previous parent.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if parent == child || self.contains(child, parent) {
            tracing::warn!(?parent, ?child, "refusing to create a cycle");
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        } else {
            return;
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        self.record_mutation(parent);
    }

    /// Remove `child` from `parent`. Returns `false` if it was not a child.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    /// Detach an element from its parent, if any.
    pub fn detach(&mut self, el: ElementId) {
        let Some(parent) = self.parent(el) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != el);
        }
        if let Some(node) = self.node_mut(el) {
            node.parent = None;
        }
        if self.active.is_some_and(|a| self.contains(el, a)) {
            self.active = None;
        }
        self.record_mutation(parent);
    }

    /// Inclusive descendant check, like `Node.contains`.
    #[must_use]
    pub fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Whether the element is attached to the document.
    #[must_use]
    pub fn is_connected(&self, el: ElementId) -> bool {
        self.contains(self.root, el)
    }

    /// Nearest inclusive ancestor matching `selector`.
    #[must_use]
    pub fn closest(&self, el: ElementId, selector: &Selector) -> Option<ElementId> {
        let mut current = Some(el);
        while let Some(node) = current {
            if selector.matches(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// All connected elements matching `selector`, in document order.
    #[must_use]
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(el) = stack.pop() {
            if selector.matches(self, el) {
                out.push(el);
            }
            stack.extend(self.children(el).iter().rev().copied());
        }
        out
    }

    /// First connected element matching `selector`.
    #[must_use]
    pub fn query_selector(&self, selector: &Selector) -> Option<ElementId> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// Connected element whose `id` attribute equals `id`.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        self.query_selector(&Selector::Id(id.to_string()))
    }

    // === Attributes ===

    /// Read an attribute. Classes live in the class list, see [`Self::classes`].
    #[must_use]
    pub fn get_attribute(&self, el: ElementId, name: &str) -> Option<&str> {
        self.node(el)?.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute. Setting `class` replaces the class list.
    pub fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(el) else {
            return;
        };
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, el: ElementId, name: &str) {
        if let Some(node) = self.node_mut(el) {
            if name == "class" {
                node.classes.clear();
            } else {
                node.attributes.remove(name);
            }
        }
    }

    /// Whether an attribute is present.
    #[must_use]
    pub fn has_attribute(&self, el: ElementId, name: &str) -> bool {
        self.node(el)
            .is_some_and(|n| n.attributes.contains_key(name))
    }

    // === Classes ===

    /// Add a class if not already present.
    pub fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.node_mut(el) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.node_mut(el) {
            node.classes.retain(|c| c != class);
        }
    }

    /// Whether the element has a class.
    #[must_use]
    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// The element's classes, in insertion order.
    #[must_use]
    pub fn classes(&self, el: ElementId) -> &[String] {
        self.node(el).map_or(&[], |n| n.classes.as_slice())
    }

    // === Inline style ===

    /// Set an inline style property. An empty value removes it.
    pub fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        if let Some(node) = self.node_mut(el) {
            if value.is_empty() {
                node.style.remove(property);
            } else {
                node.style.insert(property.to_string(), value.to_string());
            }
        }
    }

    /// Read an inline style property.
    #[must_use]
    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.node(el)
            .and_then(|n| n.style.get(property))
            .map(String::as_str)
    }

    // === Content ===

    /// Text (raw markup) held directly by the element.
    #[must_use]
    pub fn text(&self, el: ElementId) -> &str {
        self.node(el).map_or("", |n| n.text.as_str())
    }

    /// Replace the element's content with `text`, dropping its children.
    pub fn set_inner(&mut self, el: ElementId, text: &str) {
        let children: Vec<ElementId> = self.children(el).to_vec();
        for child in children {
            self.detach(child);
        }
        if let Some(node) = self.node_mut(el) {
            node.text = text.to_string();
        } else {
            return;
        }
        self.record_mutation(el);
    }

    /// Replace the content of `dst` with a deep copy of the content of `src`.
    pub fn copy_inner(&mut self, src: ElementId, dst: ElementId) {
        let text = self.text(src).to_string();
        self.set_inner(dst, &text);
        let children: Vec<ElementId> = self.children(src).to_vec();
        for child in children {
            let copy = self.clone_subtree(child);
            self.append_child(dst, copy);
        }
    }

    fn clone_subtree(&mut self, el: ElementId) -> ElementId {
        let Some(source) = self.node(el).cloned() else {
            return el;
        };
        let copy = self.create_element(&source.tag);
        if let Some(node) = self.node_mut(copy) {
            node.attributes = source.attributes;
            node.classes = source.classes;
            node.style = source.style;
            node.text = source.text;
            node.rect = source.rect;
        }
        for child in source.children {
            let child_copy = self.clone_subtree(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    // === Layout ===

    /// Report the element's layout rectangle.
    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        if let Some(node) = self.node_mut(el) {
            node.rect = rect;
        }
    }

    /// The element's layout rectangle.
    #[must_use]
    pub fn rect(&self, el: ElementId) -> Rect {
        self.node(el).map_or_else(Rect::default, |n| n.rect)
    }

    /// Set the viewport rectangle.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// The viewport rectangle.
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Whether the element's rectangle lies fully inside the viewport.
    #[must_use]
    pub fn in_viewport(&self, el: ElementId) -> bool {
        self.viewport.contains_rect(&self.rect(el))
    }

    // === Focus ===

    /// Move focus to an element.
    pub fn focus(&mut self, el: ElementId) {
        if self.node(el).is_some() {
            self.active = Some(el);
        }
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Currently focused element.
    #[must_use]
    pub const fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    // === Mutation observation ===

    /// Observe child-list and text mutations in the subtree rooted at `target`.
    pub fn observe(&mut self, target: ElementId) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push(Observer {
            id,
            target,
            pending: false,
        });
        id
    }

    /// Stop observing. Pending records for this observer are dropped.
    pub fn disconnect(&mut self, id: ObserverId) {
        self.observers.retain(|o| o.id != id);
    }

    /// Observers with pending mutations, clearing their pending state.
    pub fn take_mutations(&mut self) -> Vec<ObserverId> {
        let mut out = Vec::new();
        for observer in &mut self.observers {
            if observer.pending {
                observer.pending = false;
                out.push(observer.id);
            }
        }
        out
    }

    fn record_mutation(&mut self, el: ElementId) {
        if self.observers.is_empty() {
            return;
        }
        let targets: Vec<(usize, ElementId)> = self
            .observers
            .iter()
            .enumerate()
            .map(|(i, o)| (i, o.target))
            .collect();
        for (i, target) in targets {
            if self.contains(target, el) {
                self.observers[i].pending = true;
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_body() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some("html"));
        assert_eq!(doc.tag(doc.body()), Some("body"));
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn test_append_and_remove() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        assert!(!doc.is_connected(div));

        doc.append_child(doc.body(), div);
        assert!(doc.is_connected(div));
        assert_eq!(doc.children(doc.body()), &[div]);

        assert!(doc.remove_child(doc.body(), div));
        assert!(!doc.is_connected(div));
        assert!(!doc.remove_child(doc.body(), div));
    }

    #[test]
    fn test_append_moves_between_parents() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(a, child);
        doc.append_child(b, child);
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.parent(child), Some(b));
    }

    #[test]
    fn test_append_refuses_cycles() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(a, b);
        doc.append_child(b, a);
        assert_eq!(doc.parent(a), None);
    }

    #[test]
    fn test_class_attribute_roundtrip() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.set_attribute(el, "class", "tippy-tooltip leave");
        assert!(doc.has_class(el, "leave"));
        doc.remove_class(el, "leave");
        doc.add_class(el, "enter");
        doc.add_class(el, "enter");
        assert_eq!(doc.classes(el), &["tippy-tooltip", "enter"]);
    }

    #[test]
    fn test_style_empty_value_removes() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.set_style(el, "transition-duration", "200ms");
        assert_eq!(doc.style(el, "transition-duration"), Some("200ms"));
        doc.set_style(el, "transition-duration", "");
        assert_eq!(doc.style(el, "transition-duration"), None);
    }

    #[test]
    fn test_closest_and_query() {
        let mut doc = Document::new();
        let popper = doc.create_element("div");
        doc.add_class(popper, "tippy-popper");
        let inner = doc.create_element("span");
        doc.append_child(popper, inner);
        doc.append_child(doc.body(), popper);

        let sel = Selector::Class("tippy-popper".to_string());
        assert_eq!(doc.closest(inner, &sel), Some(popper));
        assert_eq!(doc.query_selector_all(&sel), vec![popper]);
    }

    #[test]
    fn test_copy_inner_is_deep() {
        let mut doc = Document::new();
        let template = doc.create_element("div");
        let strong = doc.create_element("strong");
        doc.set_inner(strong, "bold");
        doc.append_child(template, strong);

        let target = doc.create_element("div");
        doc.copy_inner(template, target);

        let copied = doc.children(target)[0];
        assert_ne!(copied, strong);
        assert_eq!(doc.tag(copied), Some("strong"));
        assert_eq!(doc.text(copied), "bold");
        assert_eq!(doc.parent(strong), Some(template));
    }

    #[test]
    fn test_observer_records_subtree_mutations() {
        let mut doc = Document::new();
        let popper = doc.create_element("div");
        let content = doc.create_element("div");
        doc.append_child(popper, content);

        let observer = doc.observe(popper);
        assert!(doc.take_mutations().is_empty());

        doc.set_inner(content, "new text");
        assert_eq!(doc.take_mutations(), vec![observer]);
        assert!(doc.take_mutations().is_empty());

        // Attribute changes are not child-list mutations.
        doc.set_attribute(content, "data-x", "1");
        assert!(doc.take_mutations().is_empty());

        doc.disconnect(observer);
        doc.set_inner(content, "again");
        assert!(doc.take_mutations().is_empty());
    }

    #[test]
    fn test_detach_clears_focus_inside_subtree() {
        let mut doc = Document::new();
        let wrapper = doc.create_element("div");
        let input = doc.create_element("input");
        doc.append_child(wrapper, input);
        doc.append_child(doc.body(), wrapper);
        doc.focus(input);
        doc.detach(wrapper);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_in_viewport() {
        let mut doc = Document::new();
        let el = doc.create_element("button");
        doc.set_rect(el, Rect::new(10.0, 10.0, 50.0, 20.0));
        assert!(doc.in_viewport(el));
        doc.set_rect(el, Rect::new(1270.0, 10.0, 50.0, 20.0));
        assert!(!doc.in_viewport(el));
    }
}
