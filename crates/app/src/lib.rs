//! Wirepad command line front end.
//!
//! Every subcommand works on a `.wrp` project file through the application
//! use cases. Rendering lives in [`render`] so output can be tested without
//! a terminal.

pub mod cli;
pub mod render;

pub use cli::Cli;
