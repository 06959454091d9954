//! Wirepad Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The variables replacer
//! - Request preparation and execution
//! - Project editing use cases

pub mod error;
pub mod execute;
pub mod ports;
pub mod use_cases;
pub mod variables;

pub use error::{ApplicationError, ApplicationResult};
pub use execute::{ExecuteRequest, PrepareError, Preparation, prepare};
pub use ports::{
    CancellationReceiver, CancellationToken, Clock, FileSystem, FileSystemError, HttpClient,
    HttpClientError, ProjectStore, cancellation,
};
pub use use_cases::EditProject;
pub use variables::{Replaced, VariableSet, VariablesReplacer, replace_in};
