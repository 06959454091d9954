//! Wirepad Domain - Core business types
//!
//! This crate defines the domain model for the Wirepad request composer:
//! the Project → Section → Request tree, request parts, section-scoped
//! variables and the execution result entity.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod project;
pub mod request;
pub mod response;
pub mod result;
pub mod settings;
pub mod variable;

pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use project::{Located, Project, RequestLocation, Section};
pub use request::{
    ApiKeyLocation, FormEncoding, FormField, Header, HttpMethod, Payload, PreparedBody,
    PreparedRequest, QueryParam, Request, SecurityEntity,
};
pub use response::{ResponseSpec, StatusCode};
pub use result::{ExecutionOutcome, ExecutionResult, Replacement, RequestErrorKind};
pub use settings::ClientSettings;
pub use variable::{Variable, normalize_key};
