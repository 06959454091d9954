//! Project editing use case.
//!
//! Each operation loads the project, changes it and saves it back through
//! the [`ProjectStore`] port.

use std::path::Path;

use tracing::info;
use wirepad_domain::{Project, Request, Section};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::ProjectStore;

/// Use case for structural edits of a stored project.
pub struct EditProject<S: ProjectStore> {
    store: S,
}

impl<S: ProjectStore> EditProject<S> {
    /// Creates a new `EditProject` use case.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates and saves an empty project.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be saved.
    pub async fn create(&self, path: &Path, label: &str) -> ApplicationResult<Project> {
        let project = Project::new(label);
        self.store.save(&project, path).await?;
        info!(path = %path.display(), label, "project created");
        Ok(project)
    }

    /// Adds a section, top-level when `parent` is `None`.
    ///
    /// `parent` is a section id or a `Section/Sub` label path. Returns the
    /// new section's id.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::NotFound`] when `parent` matches nothing,
    /// or a storage error.
    pub async fn add_section(
        &self,
        path: &Path,
        parent: Option<&str>,
        label: &str,
    ) -> ApplicationResult<String> {
        let mut project = self.store.load(path).await?;
        let section = Section::new(label);
        let id = section.id.clone();

        match parent {
            None => project.sections.push(section),
            Some(reference) => section_mut(&mut project, reference)?.sections.push(section),
        }

        self.store.save(&project, path).await?;
        info!(id = %id, label, "section added");
        Ok(id)
    }

    /// Adds a request to the section named by id or label path.
    ///
    /// Returns the request's id.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::NotFound`] when the section does not
    /// exist, or a storage error.
    pub async fn add_request(
        &self,
        path: &Path,
        section: &str,
        request: Request,
    ) -> ApplicationResult<String> {
        let mut project = self.store.load(path).await?;
        let id = request.id.clone();
        let label = request.label.clone();
        section_mut(&mut project, section)?.requests.push(request);

        self.store.save(&project, path).await?;
        info!(id = %id, label = %label, "request added");
        Ok(id)
    }

    /// Duplicates a section or request next to the original.
    ///
    /// # Errors
    ///
    /// Returns a domain error when the id is unknown, or a storage error.
    pub async fn duplicate(&self, path: &Path, id: &str) -> ApplicationResult<String> {
        let mut project = self.store.load(path).await?;
        let copy_id = project.duplicate(id)?;
        self.store.save(&project, path).await?;
        info!(source = id, copy = %copy_id, "item duplicated");
        Ok(copy_id)
    }

    /// Removes a section or request.
    ///
    /// # Errors
    ///
    /// Returns a domain error when the id is unknown, or a storage error.
    pub async fn remove(&self, path: &Path, id: &str) -> ApplicationResult<()> {
        let mut project = self.store.load(path).await?;
        project.remove(id)?;
        self.store.save(&project, path).await?;
        info!(id, "item removed");
        Ok(())
    }
}

fn section_mut<'a>(
    project: &'a mut Project,
    reference: &str,
) -> ApplicationResult<&'a mut Section> {
    let id = project
        .find_section_by_path(reference)
        .map_or_else(|| reference.to_string(), |s| s.id.clone());
    project
        .section_mut(&id)
        .ok_or_else(|| ApplicationError::NotFound(format!("section '{reference}'")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use wirepad_domain::DomainError;

    /// In-memory store keyed by path.
    #[derive(Default)]
    struct MemoryStore {
        projects: Mutex<HashMap<PathBuf, Project>>,
    }

    impl ProjectStore for MemoryStore {
        async fn load(&self, path: &Path) -> ApplicationResult<Project> {
            self.projects
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| ApplicationError::NotFound(path.display().to_string()))
        }

        async fn save(&self, project: &Project, path: &Path) -> ApplicationResult<()> {
            self.projects
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), project.clone());
            Ok(())
        }
    }

    fn file() -> PathBuf {
        PathBuf::from("demo.wrp")
    }

    #[tokio::test]
    async fn test_create_then_add_section_and_request() {
        let edit = EditProject::new(MemoryStore::default());
        edit.create(&file(), "Demo").await.unwrap();

        let api = edit.add_section(&file(), None, "API").await.unwrap();
        edit.add_section(&file(), Some("API"), "Users")
            .await
            .unwrap();
        let request_id = edit
            .add_request(&file(), "api/users", Request::get("List", "https://x/users"))
            .await
            .unwrap();

        let project = edit.store.load(&file()).await.unwrap();
        assert_eq!(project.sections[0].id, api);
        assert_eq!(project.section_count(), 2);
        let located = project.find_request(&request_id).unwrap();
        assert_eq!(located.as_location().path(), "API/Users/List");
    }

    #[tokio::test]
    async fn test_add_request_by_section_id() {
        let edit = EditProject::new(MemoryStore::default());
        edit.create(&file(), "Demo").await.unwrap();
        let api = edit.add_section(&file(), None, "API").await.unwrap();

        edit.add_request(&file(), &api, Request::get("Ping", "https://x/ping"))
            .await
            .unwrap();

        let project = edit.store.load(&file()).await.unwrap();
        assert_eq!(project.request_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_section_is_not_found() {
        let edit = EditProject::new(MemoryStore::default());
        edit.create(&file(), "Demo").await.unwrap();

        let result = edit
            .add_request(&file(), "Nope", Request::get("Ping", "https://x"))
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_and_remove() {
        let edit = EditProject::new(MemoryStore::default());
        edit.create(&file(), "Demo").await.unwrap();
        let api = edit.add_section(&file(), None, "API").await.unwrap();
        let ping = edit
            .add_request(&file(), &api, Request::get("Ping", "https://x/ping"))
            .await
            .unwrap();

        let copy = edit.duplicate(&file(), &ping).await.unwrap();
        assert_ne!(copy, ping);
        assert_eq!(edit.store.load(&file()).await.unwrap().request_count(), 2);

        edit.remove(&file(), &ping).await.unwrap();
        let project = edit.store.load(&file()).await.unwrap();
        assert_eq!(project.sections[0].requests[0].label, "Ping (copy)");

        let missing = edit.remove(&file(), &ping).await;
        assert!(matches!(
            missing,
            Err(ApplicationError::Domain(DomainError::UnknownItem(_)))
        ));
    }
}
