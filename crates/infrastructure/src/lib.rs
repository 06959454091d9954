//! Wirepad Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, the `.wrp` project file format,
//! Postman import/export and logging setup.

pub mod adapters;
pub mod codec;
pub mod export;
pub mod import;
pub mod logging;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use codec::CodecError;
pub use export::{ExportError, ExportOptions, ExportReport, PostmanExporter};
pub use import::postman::{
    EnvironmentReport, ImportConfig, ImportError, ImportFormat, ImportPreview, ImportReport,
    ImportWarning, PostmanImporter, ValidationResult, WarningSeverity, WarningStats,
};
pub use logging::{InspectorEntry, InspectorLayer, LoggingError, init_logging};
pub use persistence::{
    PersistenceError, SettingsError, SettingsRepository, TokioFileSystem, WrpProjectStore,
};
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
