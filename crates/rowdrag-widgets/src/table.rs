#![forbid(unsafe_code)]

//! In-memory table view.
//!
//! [`TableView`] lays rows out top to bottom (sections back to back, no
//! headers) with per-row heights, tracks a scroll offset and content insets,
//! and applies batched structural updates the way a platform table does:
//! within a batch, deletions use pre-batch indices and insertions use
//! post-batch indices. Heights travel with their rows: a row deleted and
//! reinserted in the same batch keeps its height.
//!
//! Every structural request is appended to an [`TableUpdate`] log so callers
//! (and tests) can see exactly what the reorder controller asked for.

use rowdrag_core::geometry::{Insets, Point, Rect, Size};

use crate::reorder::{RowAnimation, RowIndex, RowSource, TableHost};

/// A structural or scroll request received by the table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableUpdate {
    Delete(Vec<RowIndex>, RowAnimation),
    Insert(Vec<RowIndex>, RowAnimation),
    Reload(Vec<RowIndex>, RowAnimation),
    Offset { y: f32, animated: bool },
    Snapshot(RowIndex),
    ClearHighlight(RowIndex),
    /// A batch was applied.
    Commit,
}

/// Snapshot produced by [`TableView`]: which row it shows and its size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSnapshot {
    pub index: RowIndex,
    pub size: Size,
}

#[derive(Debug, Default)]
struct PendingBatch {
    deletes: Vec<RowIndex>,
    inserts: Vec<RowIndex>,
}

/// A headless table view implementing [`TableHost`].
#[derive(Debug)]
pub struct TableView {
    frame: Size,
    sections: Vec<Vec<f32>>,
    default_row_height: f32,
    inset: Insets,
    offset: Point,
    batch_depth: usize,
    pending: PendingBatch,
    log: Vec<TableUpdate>,
}

impl TableView {
    /// An empty table with the given frame size.
    #[must_use]
    pub fn new(frame: Size) -> Self {
        Self {
            frame,
            sections: Vec::new(),
            default_row_height: 44.0,
            inset: Insets::default(),
            offset: Point::default(),
            batch_depth: 0,
            pending: PendingBatch::default(),
            log: Vec::new(),
        }
    }

    /// Table sized to match a row source, every row `row_height` tall.
    #[must_use]
    pub fn for_source<S: RowSource + ?Sized>(frame: Size, source: &S, row_height: f32) -> Self {
        let mut table = Self::new(frame).default_row_height(row_height);
        for section in 0..source.section_count() {
            table = table.with_section(source.row_count(section), row_height);
        }
        table
    }

    /// Append a section of `rows` uniform rows.
    #[must_use]
    pub fn with_section(mut self, rows: usize, height: f32) -> Self {
        self.sections.push(vec![height; rows]);
        self
    }

    /// Append a section with explicit per-row heights.
    #[must_use]
    pub fn with_row_heights(mut self, heights: impl IntoIterator<Item = f32>) -> Self {
        self.sections.push(heights.into_iter().collect());
        self
    }

    /// Height used for inserted rows that have no deleted counterpart.
    #[must_use]
    pub fn default_row_height(mut self, height: f32) -> Self {
        self.default_row_height = height;
        self
    }

    #[must_use]
    pub fn content_inset(mut self, inset: Insets) -> Self {
        self.inset = inset;
        self
    }

    /// Scroll so that `offset.y` is the topmost visible content coordinate.
    pub fn scroll_to(&mut self, offset: Point) {
        self.offset = offset;
    }

    pub fn set_frame(&mut self, frame: Size) {
        self.frame = frame;
    }

    #[must_use]
    pub fn frame(&self) -> Size {
        self.frame
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn row_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Vec::len)
    }

    /// Height of a row, if it exists.
    #[must_use]
    pub fn row_height(&self, index: RowIndex) -> Option<f32> {
        self.sections.get(index.section)?.get(index.row).copied()
    }

    /// Requests received so far.
    #[must_use]
    pub fn updates(&self) -> &[TableUpdate] {
        &self.log
    }

    /// Drain the request log.
    pub fn take_updates(&mut self) -> Vec<TableUpdate> {
        std::mem::take(&mut self.log)
    }

    /// Whether a batch is open.
    #[must_use]
    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    fn section_top(&self, section: usize) -> f32 {
        self.sections[..section].iter().flatten().sum()
    }

    fn apply_pending(&mut self) {
        let PendingBatch {
            mut deletes,
            mut inserts,
        } = std::mem::take(&mut self.pending);
        if deletes.is_empty() && inserts.is_empty() {
            return;
        }

        // Delete from the bottom up so earlier indices stay valid.
        deletes.sort_unstable();
        deletes.dedup();
        let mut freed = Vec::with_capacity(deletes.len());
        for index in deletes.iter().rev() {
            let heights = &mut self.sections[index.section];
            debug_assert!(index.row < heights.len(), "delete out of range: {index}");
            freed.push(heights.remove(index.row));
        }
        freed.reverse();

        inserts.sort_unstable();
        let mut freed = freed.into_iter();
        for index in &inserts {
            let height = freed.next().unwrap_or(self.default_row_height);
            if index.section >= self.sections.len() {
                self.sections.resize_with(index.section + 1, Vec::new);
            }
            let heights = &mut self.sections[index.section];
            debug_assert!(index.row <= heights.len(), "insert out of range: {index}");
            heights.insert(index.row, height);
        }
        self.log.push(TableUpdate::Commit);
    }
}

impl TableHost for TableView {
    type Snapshot = RowSnapshot;

    fn rect_for_row(&self, index: RowIndex) -> Rect {
        let Some(height) = self.row_height(index) else {
            return Rect::default();
        };
        let top = self.section_top(index.section)
            + self.sections[index.section][..index.row].iter().sum::<f32>();
        Rect::new(0.0, top, self.frame.width, height)
    }

    fn row_at_point(&self, point: Point) -> Option<RowIndex> {
        if point.y < 0.0 {
            return None;
        }
        let mut top = 0.0;
        for (section, heights) in self.sections.iter().enumerate() {
            for (row, height) in heights.iter().enumerate() {
                let bottom = top + height;
                if point.y < bottom {
                    return Some(RowIndex::new(section, row));
                }
                top = bottom;
            }
        }
        None
    }

    fn visible_rows(&self) -> Vec<RowIndex> {
        let view_top = self.offset.y;
        let view_bottom = view_top + self.frame.height;
        let mut rows = Vec::new();
        let mut top = 0.0;
        for (section, heights) in self.sections.iter().enumerate() {
            for (row, height) in heights.iter().enumerate() {
                let rect = Rect::new(0.0, top, self.frame.width, *height);
                if rect.intersects_rows(view_top, view_bottom) {
                    rows.push(RowIndex::new(section, row));
                }
                top += height;
            }
        }
        rows
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.frame)
    }

    fn content_size(&self) -> Size {
        let height = self.sections.iter().flatten().sum();
        Size::new(self.frame.width, height)
    }

    fn content_inset(&self) -> Insets {
        self.inset
    }

    fn content_offset(&self) -> Point {
        self.offset
    }

    fn set_content_offset(&mut self, offset: Point, animated: bool) {
        self.offset = offset;
        self.log.push(TableUpdate::Offset {
            y: offset.y,
            animated,
        });
    }

    fn begin_updates(&mut self) {
        self.batch_depth += 1;
    }

    fn end_updates(&mut self) {
        debug_assert!(self.batch_depth > 0, "end_updates without begin_updates");
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 {
            self.apply_pending();
        }
    }

    fn delete_rows(&mut self, rows: &[RowIndex], animation: RowAnimation) {
        self.log.push(TableUpdate::Delete(rows.to_vec(), animation));
        self.pending.deletes.extend_from_slice(rows);
        if self.batch_depth == 0 {
            self.apply_pending();
        }
    }

    fn insert_rows(&mut self, rows: &[RowIndex], animation: RowAnimation) {
        self.log.push(TableUpdate::Insert(rows.to_vec(), animation));
        self.pending.inserts.extend_from_slice(rows);
        if self.batch_depth == 0 {
            self.apply_pending();
        }
    }

    fn reload_rows(&mut self, rows: &[RowIndex], animation: RowAnimation) {
        self.log.push(TableUpdate::Reload(rows.to_vec(), animation));
    }

    fn snapshot_row(&mut self, index: RowIndex) -> RowSnapshot {
        self.log.push(TableUpdate::Snapshot(index));
        RowSnapshot {
            index,
            size: self.rect_for_row(index).size(),
        }
    }

    fn clear_highlight(&mut self, index: RowIndex) {
        self.log.push(TableUpdate::ClearHighlight(index));
    }
}
