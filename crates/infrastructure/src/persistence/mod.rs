//! File persistence: `.wrp` project files and client settings.

mod file_system;
mod project_store;
mod settings_repository;
mod wrp;

pub use file_system::TokioFileSystem;
pub use project_store::{PersistenceError, WrpProjectStore, decode, encode};
pub use settings_repository::{SettingsError, SettingsRepository};
pub use wrp::{FORMAT_TAG, SCHEMA_VERSION};
