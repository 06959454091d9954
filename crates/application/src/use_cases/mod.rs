//! Application use cases (business logic orchestration).

mod edit_project;

pub use edit_project::EditProject;
