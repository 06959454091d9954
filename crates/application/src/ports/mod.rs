//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod file_system;
mod http_client;
mod project_store;

pub use clock::Clock;
pub use file_system::{FileSystem, FileSystemError};
pub use http_client::{
    CancellationReceiver, CancellationToken, HttpClient, HttpClientError, cancellation,
};
pub use project_store::ProjectStore;
