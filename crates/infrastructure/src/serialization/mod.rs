//! Deterministic JSON output for files Wirepad writes.
//!
//! Struct fields serialize in declaration order, output uses 2-space
//! indentation and ends with a newline, so saving an unchanged project
//! rewrites identical bytes.

mod json;

pub use json::*;
