//! Document sources for the extraction workspace

pub mod config;
pub mod sources;

use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use config::{load_settings, load_settings_or_default};
pub use sources::{DocumentSource, JsonSource, SampleSource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}
