//! Per-frame repositioning: sticky tooltips and cursor following.

use crate::engine::{PopperId, Tooltips};
use crate::factory::{PLACEMENT_ATTR, TRANSITION_DURATION};
use crate::settings::{Position, Side};
use crate::task::Task;
use poptip_core::{Point, Size};

/// Keep follow-cursor poppers this far from the page edges.
const VIEWPORT_PADDING: f32 = 10.0;

/// Popper origin for a follow-cursor tooltip.
///
/// `offset` is the `(cross, main)` offset setting. Top and bottom
/// placements are clamped horizontally into `page_width`.
#[must_use]
pub fn follow_cursor_position(
    cursor: Point,
    side: Side,
    popper: Size,
    offset: (f32, f32),
    page_width: f32,
) -> Point {
    let (dx, dy) = offset;
    let half_width = (popper.width / 2.0).round();
    let half_height = (popper.height / 2.0).round();

    let (mut x, y) = match side {
        Side::Top => (cursor.x - half_width + dx, cursor.y - 2.25 * half_height),
        Side::Left => (cursor.x - 2.0 * half_width - 10.0, cursor.y - half_height + dy),
        Side::Right => (cursor.x + half_height, cursor.y - half_height + dy),
        Side::Bottom => (cursor.x - half_width + dx, cursor.y + half_height / 1.5),
    };

    if side.is_vertical() {
        if cursor.x + VIEWPORT_PADDING + half_width + dx > page_width {
            x = page_width - VIEWPORT_PADDING - 2.0 * half_width;
        }
        if cursor.x - VIEWPORT_PADDING - half_width + dx < 0.0 {
            x = VIEWPORT_PADDING;
        }
    }
    Point::new(x, y)
}

impl Tooltips {
    /// Start the sticky loop after the first placement has landed.
    ///
    /// A loop left over from an earlier show is dropped; one record runs one loop.
    pub(crate) fn start_sticky(&mut self, popper: PopperId) {
        self.tasks
            .cancel_where(|task| matches!(task, Task::StickyTick(p) if *p == popper));
        self.tasks.defer(Task::StickyTick(popper));
    }

    pub(crate) fn sticky_tick(&mut self, popper: PopperId) {
        self.update_placement(popper, false);
        let Some(record) = self.registry.by_popper(popper) else {
            return;
        };
        let (duration, visible) = (record.settings.sticky_duration, record.is_visible());
        self.document
            .set_style(popper, TRANSITION_DURATION, &format!("{duration}ms"));
        if visible {
            self.tasks.request_frame(Task::StickyTick(popper));
        } else {
            self.document.set_style(popper, TRANSITION_DURATION, "");
        }
    }

    pub(crate) fn follow_cursor(&mut self, popper: PopperId, cursor: Point) {
        let Some(record) = self.registry.by_popper(popper) else {
            return;
        };
        let side = self
            .document
            .get_attribute(popper, PLACEMENT_ATTR)
            .and_then(|p| p.parse::<Position>().ok())
            .map_or(Side::Top, Position::side);
        let at = follow_cursor_position(
            cursor,
            side,
            self.document.rect(popper).size(),
            record.settings.offset,
            self.document.viewport().width,
        );
        self.document.set_style(
            popper,
            "transform",
            &format!("translate3d({}px, {}px, 0)", at.x, at.y),
        );
    }
}
