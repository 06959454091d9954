//! Export infrastructure.

mod postman;

pub use postman::{ExportOptions, ExportReport, PostmanExporter, SCHEMA_V21, to_postman_tokens};

use thiserror::Error;

/// Export error type.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
