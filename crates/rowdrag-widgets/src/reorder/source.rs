#![forbid(unsafe_code)]

//! The data source contract and a `Vec`-backed reference implementation.
//!
//! The contract is a closed, trusted-caller interface: the controller only
//! passes indices it obtained from the host, and implementations may panic
//! on out-of-range indices or a misplaced blank.

use super::RowIndex;

/// Row provider capabilities.
pub trait RowSource {
    fn section_count(&self) -> usize {
        1
    }

    fn row_count(&self, section: usize) -> usize;

    /// Whether the row at `index` may be picked up.
    fn is_movable(&self, index: RowIndex) -> bool;

    /// Adjust a proposed drop target. `None` means "leave the hover index
    /// where it is".
    fn customize_target(&self, origin: RowIndex, proposed: Option<RowIndex>) -> Option<RowIndex> {
        same_section_target(origin, proposed)
    }

    /// Rows across all sections.
    fn total_rows(&self) -> usize {
        (0..self.section_count()).map(|s| self.row_count(s)).sum()
    }
}

/// Reorder callbacks on top of [`RowSource`].
///
/// Between [`stage_and_blank`](ReorderSource::stage_and_blank) and
/// [`finalize`](ReorderSource::finalize) the list holds exactly one blank
/// slot and its length never changes.
pub trait ReorderSource: RowSource {
    /// The item lifted out of the list for the duration of a drag.
    type Payload;

    /// Remove and return the item at `index`, leaving a blank in its place.
    fn stage_and_blank(&mut self, index: RowIndex) -> Self::Payload;

    /// Relocate the blank from `from` to `to`.
    fn move_row(&mut self, from: RowIndex, to: RowIndex);

    /// Replace the blank at `index` with `payload`.
    fn finalize(&mut self, payload: Self::Payload, index: RowIndex);
}

/// Default target policy: stay within the origin's section.
///
/// A target in another section falls back to `origin`; no target means no
/// change.
#[must_use]
pub fn same_section_target(origin: RowIndex, proposed: Option<RowIndex>) -> Option<RowIndex> {
    match proposed {
        Some(p) if p.section != origin.section => Some(origin),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// VecSource
// ---------------------------------------------------------------------------

type MovablePredicate<T> = Box<dyn Fn(&T) -> bool>;
type MoveObserver<T> = Box<dyn FnMut(&T, usize)>;

/// Single-section source backed by a `Vec`.
///
/// The blank is an empty slot. After every completed drop the optional move
/// observer receives the settled item and its final row.
pub struct VecSource<T> {
    slots: Vec<Option<T>>,
    movable: Option<MovablePredicate<T>>,
    on_move: Option<MoveObserver<T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for VecSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecSource")
            .field("slots", &self.slots)
            .field("has_movable_predicate", &self.movable.is_some())
            .field("has_observer", &self.on_move.is_some())
            .finish()
    }
}

impl<T> VecSource<T> {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            slots: items.into_iter().map(Some).collect(),
            movable: None,
            on_move: None,
        }
    }

    /// Only items satisfying `pred` may be picked up.
    #[must_use]
    pub fn with_movable(mut self, pred: impl Fn(&T) -> bool + 'static) -> Self {
        self.movable = Some(Box::new(pred));
        self
    }

    /// Observe `(item, row)` after every finalize.
    #[must_use]
    pub fn on_move(mut self, observer: impl FnMut(&T, usize) + 'static) -> Self {
        self.on_move = Some(Box::new(observer));
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Item at `row`; `None` for the blank or out of range.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&T> {
        self.slots.get(row).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn blank_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Row of the first blank slot.
    #[must_use]
    pub fn blank_row(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Consume the source, returning the items in order.
    ///
    /// A blank (only present mid-drag) is skipped.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.slots.into_iter().flatten().collect()
    }
}

impl<T: Clone> VecSource<T> {
    /// Clone the current items in order, skipping a blank.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.slots.iter().flatten().cloned().collect()
    }
}

impl<T> RowSource for VecSource<T> {
    fn row_count(&self, section: usize) -> usize {
        if section == 0 { self.slots.len() } else { 0 }
    }

    fn is_movable(&self, index: RowIndex) -> bool {
        if index.section != 0 {
            return false;
        }
        match self.slots.get(index.row) {
            Some(Some(item)) => self.movable.as_ref().is_none_or(|pred| pred(item)),
            _ => false,
        }
    }
}

impl<T> ReorderSource for VecSource<T> {
    type Payload = T;

    /// # Panics
    ///
    /// Panics if the row is out of range or already blank.
    fn stage_and_blank(&mut self, index: RowIndex) -> T {
        debug_assert_eq!(index.section, 0, "VecSource has a single section");
        debug_assert_eq!(self.blank_count(), 0, "a drag is already staged");
        let Some(item) = self.slots[index.row].take() else {
            panic!("stage_and_blank: row {} is already blank", index.row);
        };
        item
    }

    fn move_row(&mut self, from: RowIndex, to: RowIndex) {
        debug_assert!(self.slots[from.row].is_none(), "move_row must move the blank");
        let slot = self.slots.remove(from.row);
        self.slots.insert(to.row, slot);
    }

    /// # Panics
    ///
    /// Panics if the row is out of range.
    fn finalize(&mut self, payload: T, index: RowIndex) {
        let previous = self.slots[index.row].replace(payload);
        debug_assert!(previous.is_none(), "finalize must land on the blank");
        debug_assert_eq!(self.blank_count(), 0);
        if let (Some(observer), Some(item)) = (self.on_move.as_mut(), self.slots[index.row].as_ref())
        {
            observer(item, index.row);
        }
    }
}
