//! HTTP request domain types

mod header;
mod method;
mod payload;
mod prepared;
mod query;
mod security;
mod spec;

pub use header::Header;
pub use method::HttpMethod;
pub use payload::{FormEncoding, FormField, Payload};
pub use prepared::{MultipartPart, PreparedBody, PreparedRequest};
pub use query::QueryParam;
pub use security::{ApiKeyLocation, SecurityEntity};
pub use spec::Request;
