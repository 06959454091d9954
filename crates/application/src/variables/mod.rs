//! Variables replacer
//!
//! Literal `<<name>>` token substitution across a request, using the
//! variables of the sections that enclose it.
//!
//! # Usage
//!
//! ```
//! use wirepad_application::variables::{VariableSet, replace_in};
//! use wirepad_domain::{Section, Variable};
//!
//! let section = Section::new("API").with_variable(Variable::new("host", "localhost"));
//! let set = VariableSet::for_sections(&[&section]);
//!
//! let (text, hits) = replace_in("http://<<host>>/api", &set);
//! assert_eq!(text, "http://localhost/api");
//! assert_eq!(hits, vec![("<<host>>".to_string(), 1)]);
//! ```

mod replacer;
mod set;

pub use replacer::{Replaced, VariablesReplacer, replace_in};
pub use set::VariableSet;
