#![forbid(unsafe_code)]

//! State of one pick-up-to-drop interaction.

use rowdrag_core::animation::{Animation, Tween};
use rowdrag_core::geometry::{Point, Rect};

use super::RowIndex;

/// The floating stand-in for the dragged row.
#[derive(Debug, Clone)]
pub struct DragProxy<I> {
    /// Appearance captured when the row was picked up.
    pub snapshot: I,
    /// Current frame in content coordinates.
    pub frame: Rect,
    pub opacity: f32,
}

impl<I> DragProxy<I> {
    /// Move the proxy vertically so its center sits at `y`.
    pub fn center_on_y(&mut self, y: f32) {
        let center = Point::new(self.frame.center().x, y);
        self.frame = self.frame.with_center(center);
    }
}

/// Drop animation carrying the proxy from where it was released onto the
/// hover row.
#[derive(Debug, Clone)]
pub(crate) struct Settle {
    pub(crate) from: Rect,
    pub(crate) tween: Tween,
}

/// Session state, present only between pick-up and drop completion.
#[derive(Debug)]
pub struct DragSession<P, I> {
    origin: RowIndex,
    pub(crate) hover: RowIndex,
    pub(crate) payload: P,
    pub(crate) scroll_rate: f32,
    pub(crate) proxy: DragProxy<I>,
    /// Touch position relative to the viewport's top-left. The finger stays
    /// put on screen while the content scrolls underneath it.
    pub(crate) touch_in_viewport: Point,
    row_height: f32,
    pub(crate) settle: Option<Settle>,
}

impl<P, I> DragSession<P, I> {
    pub(crate) fn new(
        origin: RowIndex,
        payload: P,
        proxy: DragProxy<I>,
        touch_in_viewport: Point,
        row_height: f32,
    ) -> Self {
        Self {
            origin,
            hover: origin,
            payload,
            scroll_rate: 0.0,
            proxy,
            touch_in_viewport,
            row_height,
            settle: None,
        }
    }

    /// Where the drag started. Fixed for the session.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> RowIndex {
        self.origin
    }

    /// Row the dragged item currently sits over (the blank's position).
    #[inline]
    #[must_use]
    pub fn hover(&self) -> RowIndex {
        self.hover
    }

    /// The item lifted out of the list.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    #[inline]
    #[must_use]
    pub fn scroll_rate(&self) -> f32 {
        self.scroll_rate
    }

    #[inline]
    #[must_use]
    pub fn proxy(&self) -> &DragProxy<I> {
        &self.proxy
    }

    /// Height of the row when it was picked up.
    #[inline]
    #[must_use]
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Whether the drop animation is running.
    #[inline]
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    /// Touch location in content coordinates for the given scroll offset.
    #[must_use]
    pub fn touch_location(&self, content_offset: Point) -> Point {
        self.touch_in_viewport
            .offset(content_offset.x, content_offset.y)
    }

    /// Advance the drop animation toward `target`. Returns `true` once it has
    /// landed.
    pub(crate) fn advance_settle(&mut self, dt: web_time::Duration, target: Rect) -> bool {
        let Some(settle) = self.settle.as_mut() else {
            return false;
        };
        settle.tween.tick(dt);
        self.proxy.frame = settle.from.lerp(&target, settle.tween.value());
        settle.tween.is_complete()
    }
}
