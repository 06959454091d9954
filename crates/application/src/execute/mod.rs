//! Request execution
//!
//! [`prepare`] turns a located request into a wire-ready
//! [`PreparedRequest`](wirepad_domain::PreparedRequest);
//! [`ExecuteRequest`] sends it and folds every ending into an
//! [`ExecutionResult`](wirepad_domain::ExecutionResult).

mod execute_request;
mod prepare;

pub use execute_request::ExecuteRequest;
pub use prepare::{PrepareError, Preparation, prepare};
