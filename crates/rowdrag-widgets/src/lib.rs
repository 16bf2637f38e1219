#![forbid(unsafe_code)]

//! Widgets for rowdrag.
//!
//! - [`reorder`]: the long-press drag-to-reorder controller, the data source
//!   contract it drives, and the hosting-view abstraction it reads geometry
//!   from.
//! - [`table`]: an in-memory table view that implements
//!   [`reorder::TableHost`] with variable row heights, sections, insets, and
//!   batched structural updates.

pub mod reorder;
pub mod table;

pub use reorder::{
    GestureOutcome, RejectReason, ReorderConfig, ReorderController, ReorderSource,
    ReorderState, RowIndex, RowSource, TableHost, VecSource,
};
pub use table::TableView;
