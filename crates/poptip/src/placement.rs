//! Placement solver contract and the built-in rectangle solver.
//!
//! The engine never computes coordinates itself. It asks a [`PlacementSolver`]
//! for a [`PlacementHandle`] on first show and then calls
//! [`PlacementHandle::update`] whenever the popper must be repositioned. The
//! handle only decides *where* the popper goes and on which side; the engine
//! applies the result and re-stamps the tooltip's own edge offset.

use crate::settings::{Alignment, Position, Settings, Side};
use poptip_core::{Document, ElementId, Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Keeps the popper away from viewport edges, flipping sides when needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipModifier {
    /// Minimum distance from the viewport edge
    pub padding: f32,
}

/// Shifts the popper after placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetModifier {
    /// `(cross axis, main axis)` shift in px
    pub offset: (f32, f32),
}

/// Modifier set passed to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Edge padding / flip
    pub flip: FlipModifier,
    /// Offset
    pub offset: OffsetModifier,
}

/// Options for a placement handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopperOptions {
    /// Preferred placement
    pub placement: Position,
    /// Modifiers
    pub modifiers: Modifiers,
}

/// Host overrides for [`PopperOptions`]; every set field replaces the value
/// derived from the other settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopperOptionsInput {
    /// Placement handed to the solver instead of `position`
    pub placement: Option<Position>,
    /// Modifier overrides
    pub modifiers: ModifiersInput,
}

/// Modifier overrides inside [`PopperOptionsInput`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModifiersInput {
    /// Replaces the distance-derived flip padding
    pub flip: Option<FlipModifier>,
    /// Replaces the `offset` setting
    pub offset: Option<OffsetModifier>,
}

impl PopperOptions {
    /// Solver options for a record's settings, with `popperOptions` applied last.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let overrides = &settings.popper_options;
        Self {
            placement: overrides.placement.unwrap_or(settings.position),
            modifiers: Modifiers {
                flip: overrides.modifiers.flip.unwrap_or(FlipModifier {
                    // 5px from the viewport boundary on top of the gap
                    padding: settings.distance + 5.0,
                }),
                offset: overrides.modifiers.offset.unwrap_or(OffsetModifier {
                    offset: settings.offset,
                }),
            },
        }
    }
}

/// Result of one placement computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Placement actually used (after flipping)
    pub position: Position,
    /// Popper rectangle in page coordinates
    pub rect: Rect,
}

/// A live positioning session for one reference/popper pair.
pub trait PlacementHandle: Debug {
    /// Recompute the placement. Returns `None` once destroyed.
    fn update(&mut self, doc: &Document) -> Option<Placement>;

    /// Recompute immediately, bypassing any batching.
    fn force_update(&mut self, doc: &Document) -> Option<Placement> {
        self.update(doc)
    }

    /// Enable or disable the handle's own scroll/resize listeners.
    fn set_event_listeners(&mut self, enabled: bool);

    /// Whether scroll/resize listeners are enabled.
    fn event_listeners_enabled(&self) -> bool;

    /// Tear down; later updates return `None`.
    fn destroy(&mut self);
}

/// Factory for placement handles.
pub trait PlacementSolver: Debug {
    /// Start positioning `popper` against `reference`.
    fn create(
        &self,
        doc: &Document,
        reference: ElementId,
        popper: ElementId,
        options: &PopperOptions,
    ) -> Box<dyn PlacementHandle>;
}

/// Solver that places the popper flush against the reference rectangle,
/// flipping to the opposite side when the preferred side leaves the viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectSolver;

impl PlacementSolver for RectSolver {
    fn create(
        &self,
        _doc: &Document,
        reference: ElementId,
        popper: ElementId,
        options: &PopperOptions,
    ) -> Box<dyn PlacementHandle> {
        Box::new(RectHandle {
            reference,
            popper,
            options: *options,
            listeners_enabled: true,
            destroyed: false,
        })
    }
}

/// Handle created by [`RectSolver`].
#[derive(Debug, Clone)]
pub struct RectHandle {
    reference: ElementId,
    popper: ElementId,
    options: PopperOptions,
    listeners_enabled: bool,
    destroyed: bool,
}

impl PlacementHandle for RectHandle {
    fn update(&mut self, doc: &Document) -> Option<Placement> {
        if self.destroyed {
            return None;
        }
        Some(compute_placement(
            doc.rect(self.reference),
            doc.rect(self.popper),
            doc.viewport(),
            &self.options,
        ))
    }

    fn set_event_listeners(&mut self, enabled: bool) {
        self.listeners_enabled = enabled;
    }

    fn event_listeners_enabled(&self) -> bool {
        self.listeners_enabled && !self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.listeners_enabled = false;
    }
}

fn place(anchor: Rect, popper: Rect, position: Position, offset: (f32, f32)) -> Point {
    let (cross, main) = offset;
    let side = position.side();

    let aligned = |start: f32, anchor_len: f32, popper_len: f32| match position.alignment() {
        Alignment::Center => start + (anchor_len - popper_len) / 2.0,
        Alignment::Start => start,
        Alignment::End => start + anchor_len - popper_len,
    };

    match side {
        Side::Top => Point::new(
            aligned(anchor.x, anchor.width, popper.width) + cross,
            anchor.y - popper.height - main,
        ),
        Side::Bottom => Point::new(
            aligned(anchor.x, anchor.width, popper.width) + cross,
            anchor.y + anchor.height + main,
        ),
        Side::Left => Point::new(
            anchor.x - popper.width - main,
            aligned(anchor.y, anchor.height, popper.height) + cross,
        ),
        Side::Right => Point::new(
            anchor.x + anchor.width + main,
            aligned(anchor.y, anchor.height, popper.height) + cross,
        ),
    }
}

fn overflows(rect: Rect, viewport: Rect, side: Side, padding: f32) -> bool {
    match side {
        Side::Top => rect.top() < viewport.top() + padding,
        Side::Bottom => rect.bottom() > viewport.bottom() - padding,
        Side::Left => rect.left() < viewport.left() + padding,
        Side::Right => rect.right() > viewport.right() - padding,
    }
}

/// Compute the popper rectangle for `options`, flipping if the preferred side overflows.
#[must_use]
pub fn compute_placement(
    anchor: Rect,
    popper: Rect,
    viewport: Rect,
    options: &PopperOptions,
) -> Placement {
    let size = popper.size();
    let padding = options.modifiers.flip.padding;
    let offset = options.modifiers.offset.offset;

    let at = |position: Position| {
        Rect::from_size(size).with_origin(place(anchor, popper, position, offset))
    };

    let preferred = options.placement;
    let rect = at(preferred);
    if overflows(rect, viewport, preferred.side(), padding) {
        let flipped = preferred.flipped();
        let flipped_rect = at(flipped);
        if !overflows(flipped_rect, viewport, flipped.side(), padding) {
            return Placement {
                position: flipped,
                rect: flipped_rect,
            };
        }
    }
    Placement {
        position: preferred,
        rect,
    }
}
