//! Postman Import Module
//!
//! Imports Postman Collection v2.0/v2.1 and Environment files into a
//! Wirepad [`Project`](wirepad_domain::Project).

pub mod environment_types;
pub mod importer;
pub mod mapper;
pub mod types;
pub mod warning;

pub use environment_types::PostmanEnvironment;
pub use importer::{
    EnvironmentReport, ImportConfig, ImportError, ImportFormat, ImportPreview, ImportReport,
    PostmanImporter, ValidationResult,
};
pub use mapper::convert_tokens;
pub use types::PostmanCollection;
pub use warning::{ImportWarning, WarningSeverity, WarningStats};
