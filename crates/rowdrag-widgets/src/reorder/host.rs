#![forbid(unsafe_code)]

//! The hosting list view, as seen by the reorder controller.

use rowdrag_core::geometry::{Insets, Point, Rect, Size};

use super::RowIndex;

/// Animation hint attached to structural row updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAnimation {
    /// Apply the change instantly.
    None,
    /// Let the host pick a suitable animation.
    #[default]
    Automatic,
}

/// Geometry and structural updates supplied by the view hosting the rows.
///
/// All points and rects are in content coordinates: a touch reported at
/// `y` lies over the row whose rect spans `y`, regardless of the current
/// scroll offset. [`bounds`](TableHost::bounds) is the visible window onto
/// that content.
///
/// Structural updates issued between [`begin_updates`](TableHost::begin_updates)
/// and [`end_updates`](TableHost::end_updates) form one batch: deletions refer
/// to indices before the batch, insertions to indices after it.
pub trait TableHost {
    /// Static image of a row used as the drag proxy.
    type Snapshot;

    /// Frame of the row at `index`.
    fn rect_for_row(&self, index: RowIndex) -> Rect;

    /// Row under `point`, if any.
    fn row_at_point(&self, point: Point) -> Option<RowIndex>;

    /// Rows currently intersecting the viewport, in display order.
    fn visible_rows(&self) -> Vec<RowIndex>;

    /// The visible viewport: origin at the content offset, size of the frame.
    fn bounds(&self) -> Rect;

    fn content_size(&self) -> Size;

    fn content_inset(&self) -> Insets;

    fn content_offset(&self) -> Point;

    fn set_content_offset(&mut self, offset: Point, animated: bool);

    fn begin_updates(&mut self);

    fn end_updates(&mut self);

    fn delete_rows(&mut self, rows: &[RowIndex], animation: RowAnimation);

    fn insert_rows(&mut self, rows: &[RowIndex], animation: RowAnimation);

    fn reload_rows(&mut self, rows: &[RowIndex], animation: RowAnimation);

    /// Capture the current appearance of a row.
    fn snapshot_row(&mut self, index: RowIndex) -> Self::Snapshot;

    /// Drop any selection/highlight on a row before it is picked up.
    fn clear_highlight(&mut self, _index: RowIndex) {}
}
