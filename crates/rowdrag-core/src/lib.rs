// Forbid unsafe in production; deny (with targeted allows) in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: geometry, gesture phases, and frame clocks for row reordering.
//!
//! # Role in rowdrag
//! `rowdrag-core` is the input layer. It owns the point/rect math used for
//! row hit testing, the long-press recognizer that turns raw pointer input
//! into phase-tagged gesture events, the display link that drives per-frame
//! work, and a small animation primitive for settling the drag proxy.
//!
//! # How it fits in the system
//! `rowdrag-widgets` consumes [`gesture::LongPressEvent`] values and
//! [`display_link::DisplayLink`] ticks to run the reorder state machine.
//! Nothing in this crate knows about lists or data sources.

pub mod animation;
pub mod display_link;
pub mod geometry;
pub mod gesture;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
