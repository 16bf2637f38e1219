use std::path::PathBuf;

use rowdrag_widgets::reorder::ReorderConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("failed to load config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ReorderConfigError,
    },

    #[error("a global tracing subscriber is already installed")]
    LoggingInit,

    #[error("scenario {scenario} did not settle after {frames} frames")]
    Unsettled { scenario: &'static str, frames: u32 },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            _ => 1,
        }
    }
}
