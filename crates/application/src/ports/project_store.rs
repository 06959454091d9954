//! Project storage port

use std::future::Future;
use std::path::Path;

use wirepad_domain::Project;

use crate::ApplicationResult;

/// Port for persisting and loading whole projects.
pub trait ProjectStore: Send + Sync {
    /// Loads a project from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load(&self, path: &Path) -> impl Future<Output = ApplicationResult<Project>> + Send;

    /// Saves a project to the specified path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be serialized or written.
    fn save(
        &self,
        project: &Project,
        path: &Path,
    ) -> impl Future<Output = ApplicationResult<()>> + Send;
}
