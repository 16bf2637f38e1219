#![forbid(unsafe_code)]

//! Headless demo for rowdrag.
//!
//! Replays scripted pointer input against a [`rowdrag_widgets::TableView`]
//! holding a list of cities and prints the resulting order. Every completed
//! move is logged as `Item <city> moved to <row>`.

pub mod cli;
pub mod error;
pub mod scenario;

pub use cli::run_from_env;
