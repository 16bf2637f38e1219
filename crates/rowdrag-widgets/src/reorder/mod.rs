#![forbid(unsafe_code)]

//! Long-press drag-to-reorder for table views.
//!
//! A row is picked up with a long press, dragged vertically (auto-scrolling
//! when the touch enters the top or bottom edge zone of the viewport), and
//! dropped at a new position. The backing list is kept in step with the
//! visual order through the [`ReorderSource`] contract.
//!
//! # Design
//!
//! ## Collaborators
//!
//! - [`ReorderController`] owns the gesture lifecycle and the optional
//!   [`DragSession`]. It is the only component that changes state.
//! - [`TableHost`] supplies row geometry and accepts structural update
//!   requests (delete/insert/reload) used for animation bookkeeping.
//! - [`ReorderSource`] (a [`RowSource`] plus the stage/move/finalize
//!   callbacks) owns the list storage.
//!
//! ## Invariants
//!
//! 1. While a session exists, the source holds exactly one blank slot, at
//!    the session's hover index.
//! 2. The source's length is the same before staging and after finalizing.
//! 3. The scroll display link exists only while dragging; it is invalidated
//!    before the session it reads is settled or torn down.
//! 4. Targets never leave the origin's section.
//!
//! ## Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Reordering disabled | `set_can_reorder(false)`, external `Began` | gesture rejected, no calls |
//! | Press during a session | a second `Began` while dragging or settling | gesture rejected, live session untouched |
//! | Empty list at press | no rows in any section | gesture rejected, no calls |
//! | Press outside any row | point resolves to no index | gesture rejected, no calls |
//! | Row not movable | source gate | gesture rejected, no calls |
//! | Gesture interrupted | focus loss / recognizer disabled | blank moved back to origin, item restored |

mod config;
mod controller;
mod host;
mod scroll;
mod session;
mod source;

pub use config::{ReorderConfig, ReorderConfigError};
pub use controller::{FrameOutcome, GestureOutcome, RejectReason, ReorderController, ReorderState};
pub use host::{RowAnimation, TableHost};
pub use scroll::{ScrollMetrics, clamp_proxy_center, next_scroll_offset, scroll_rate};
pub use session::{DragProxy, DragSession};
pub use source::{ReorderSource, RowSource, VecSource, same_section_target};

/// Identifies a row by section and position within the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RowIndex {
    pub section: usize,
    pub row: usize,
}

impl RowIndex {
    #[must_use]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }

    /// Row `row` of section 0.
    #[must_use]
    pub const fn row(row: usize) -> Self {
        Self { section: 0, row }
    }
}

impl std::fmt::Display for RowIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.section, self.row)
    }
}
