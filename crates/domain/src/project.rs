//! Project tree: Project → Section → Request.
//!
//! Sections nest to any depth. Each section can define variables and a
//! security entity that requests below it inherit.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::generate_id;
use crate::request::{Request, SecurityEntity};
use crate::variable::Variable;

/// Root of a saved request tree; one `.wrp` file holds one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: String,
    /// Project name
    pub label: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Top-level sections
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A folder of requests, optionally carrying variables and security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier
    pub id: String,
    /// Section name
    pub label: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Variables visible to every request below this section
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// Security inherited by requests set to [`SecurityEntity::Inherit`]
    #[serde(default)]
    pub security: SecurityEntity,
    /// Child sections
    #[serde(default)]
    pub sections: Vec<Self>,
    /// Requests directly in this section
    #[serde(default)]
    pub requests: Vec<Request>,
}

/// A request found in the tree together with its ancestor sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocation<'a> {
    /// Ancestor sections, outermost first.
    pub sections: &'a [&'a Section],
    /// The request itself.
    pub request: &'a Request,
}

/// Owned form of the ancestor chain, returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<'a> {
    /// Ancestor sections, outermost first.
    pub sections: Vec<&'a Section>,
    /// The request itself.
    pub request: &'a Request,
}

impl Located<'_> {
    /// Borrows this lookup result as a [`RequestLocation`].
    #[must_use]
    pub fn as_location(&self) -> RequestLocation<'_> {
        RequestLocation {
            sections: &self.sections,
            request: self.request,
        }
    }
}

impl RequestLocation<'_> {
    /// Resolves [`SecurityEntity::Inherit`] against the ancestor chain.
    ///
    /// The request's own entity wins unless it inherits; then the nearest
    /// section with a non-inherit entity wins. A chain that inherits all the
    /// way up resolves to [`SecurityEntity::None`].
    #[must_use]
    pub fn effective_security(&self) -> SecurityEntity {
        std::iter::once(&self.request.security)
            .chain(self.sections.iter().rev().map(|s| &s.security))
            .find(|s| !s.is_inherit())
            .cloned()
            .unwrap_or(SecurityEntity::None)
    }

    /// `Section/Sub/Request` path made of labels.
    #[must_use]
    pub fn path(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.label.as_str())
            .chain(std::iter::once(self.request.label.as_str()))
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl Project {
    /// Creates an empty project.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            label: label.into(),
            notes: String::new(),
            sections: Vec::new(),
        }
    }

    /// Appends a top-level section.
    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Finds a request by id.
    #[must_use]
    pub fn find_request(&self, id: &str) -> Option<Located<'_>> {
        let mut chain = Vec::new();
        self.sections.iter().find_map(|section| {
            chain.clear();
            section
                .locate(id, &mut chain)
                .map(|request| Located {
                    sections: chain.clone(),
                    request,
                })
        })
    }

    /// Finds a request by a `Section/Sub/Request` label path.
    ///
    /// Labels compare case-insensitively after trimming.
    #[must_use]
    pub fn find_request_by_path(&self, path: &str) -> Option<Located<'_>> {
        let segments: Vec<&str> = path
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let (request_label, section_labels) = segments.split_last()?;
        if section_labels.is_empty() {
            return None;
        }

        let mut chain = Vec::with_capacity(section_labels.len());
        let mut candidates = &self.sections;
        for label in section_labels {
            let section = candidates.iter().find(|s| labels_match(&s.label, label))?;
            chain.push(section);
            candidates = &section.sections;
        }

        let parent = chain.last()?;
        let request = parent
            .requests
            .iter()
            .find(|r| labels_match(&r.label, request_label))?;
        Some(Located {
            sections: chain,
            request,
        })
    }

    /// Finds a section anywhere in the tree for editing.
    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find_map(|s| s.section_mut(id))
    }

    /// Finds a request anywhere in the tree for editing.
    pub fn request_mut(&mut self, id: &str) -> Option<&mut Request> {
        self.sections.iter_mut().find_map(|s| s.request_mut(id))
    }

    /// Removes the section or request with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownItem`] when nothing carries the id.
    pub fn remove(&mut self, id: &str) -> DomainResult<()> {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != id);
        if self.sections.len() != before {
            return Ok(());
        }
        if self.sections.iter_mut().any(|s| s.remove(id)) {
            Ok(())
        } else {
            Err(DomainError::UnknownItem(id.to_string()))
        }
    }

    /// Duplicates the section or request with the given id in place.
    ///
    /// The copy lands right after the original and its id is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownItem`] when nothing carries the id.
    pub fn duplicate(&mut self, id: &str) -> DomainResult<String> {
        if let Some(pos) = self.sections.iter().position(|s| s.id == id) {
            let copy = self.sections[pos].duplicate();
            let copy_id = copy.id.clone();
            self.sections.insert(pos + 1, copy);
            return Ok(copy_id);
        }
        self.sections
            .iter_mut()
            .find_map(|s| s.duplicate_child(id))
            .ok_or_else(|| DomainError::UnknownItem(id.to_string()))
    }

    /// Finds a section by a `Section/Sub` label path, case-insensitively.
    #[must_use]
    pub fn find_section_by_path(&self, path: &str) -> Option<&Section> {
        let mut found: Option<&Section> = None;
        let mut candidates = &self.sections;
        for label in path.split('/').map(str::trim).filter(|s| !s.is_empty()) {
            let section = candidates.iter().find(|s| labels_match(&s.label, label))?;
            candidates = &section.sections;
            found = Some(section);
        }
        found
    }

    /// Total number of requests in the tree.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.sections.iter().map(Section::request_count).sum()
    }

    /// Total number of sections in the tree.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.iter().map(Section::section_count).sum()
    }
}

impl Section {
    /// Creates an empty section that inherits security.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            label: label.into(),
            notes: String::new(),
            variables: Vec::new(),
            security: SecurityEntity::Inherit,
            sections: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Appends a child section.
    #[must_use]
    pub fn with_section(mut self, section: Self) -> Self {
        self.sections.push(section);
        self
    }

    /// Appends a request.
    #[must_use]
    pub fn with_request(mut self, request: Request) -> Self {
        self.requests.push(request);
        self
    }

    /// Appends a variable.
    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Sets the security entity.
    #[must_use]
    pub fn with_security(mut self, security: SecurityEntity) -> Self {
        self.security = security;
        self
    }

    /// Deep copy with fresh ids for this section and everything below it.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let mut copy = self.renumbered();
        copy.label = format!("{} (copy)", self.label);
        copy
    }

    fn renumbered(&self) -> Self {
        Self {
            id: generate_id(),
            label: self.label.clone(),
            notes: self.notes.clone(),
            variables: self.variables.clone(),
            security: self.security.clone(),
            sections: self.sections.iter().map(Self::renumbered).collect(),
            requests: self
                .requests
                .iter()
                .map(|r| Request {
                    id: generate_id(),
                    ..r.clone()
                })
                .collect(),
        }
    }

    fn locate<'a>(&'a self, id: &str, chain: &mut Vec<&'a Self>) -> Option<&'a Request> {
        chain.push(self);
        if let Some(request) = self.requests.iter().find(|r| r.id == id) {
            return Some(request);
        }
        for child in &self.sections {
            if let Some(request) = child.locate(id, chain) {
                return Some(request);
            }
        }
        chain.pop();
        None
    }

    fn section_mut(&mut self, id: &str) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        self.sections.iter_mut().find_map(|s| s.section_mut(id))
    }

    fn request_mut(&mut self, id: &str) -> Option<&mut Request> {
        if let Some(pos) = self.requests.iter().position(|r| r.id == id) {
            return self.requests.get_mut(pos);
        }
        self.sections.iter_mut().find_map(|s| s.request_mut(id))
    }

    fn remove(&mut self, id: &str) -> bool {
        let before = self.requests.len() + self.sections.len();
        self.requests.retain(|r| r.id != id);
        self.sections.retain(|s| s.id != id);
        if self.requests.len() + self.sections.len() != before {
            return true;
        }
        self.sections.iter_mut().any(|s| s.remove(id))
    }

    fn duplicate_child(&mut self, id: &str) -> Option<String> {
        if let Some(pos) = self.requests.iter().position(|r| r.id == id) {
            let copy = self.requests[pos].duplicate();
            let copy_id = copy.id.clone();
            self.requests.insert(pos + 1, copy);
            return Some(copy_id);
        }
        if let Some(pos) = self.sections.iter().position(|s| s.id == id) {
            let copy = self.sections[pos].duplicate();
            let copy_id = copy.id.clone();
            self.sections.insert(pos + 1, copy);
            return Some(copy_id);
        }
        self.sections.iter_mut().find_map(|s| s.duplicate_child(id))
    }

    fn request_count(&self) -> usize {
        self.requests.len() + self.sections.iter().map(Self::request_count).sum::<usize>()
    }

    fn section_count(&self) -> usize {
        1 + self.sections.iter().map(Self::section_count).sum::<usize>()
    }
}

fn labels_match(label: &str, wanted: &str) -> bool {
    label.trim().to_lowercase() == wanted.to_lowercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> (Project, String) {
        let login = Request::get("Login", "https://<<host>>/login");
        let login_id = login.id.clone();
        let project = Project::new("Demo").with_section(
            Section::new("API")
                .with_security(SecurityEntity::bearer("root-token"))
                .with_request(Request::get("Health", "https://<<host>>/health"))
                .with_section(Section::new("Auth").with_request(login)),
        );
        (project, login_id)
    }

    #[test]
    fn test_find_request_returns_chain() {
        let (project, login_id) = sample();
        let located = project.find_request(&login_id).expect("login exists");
        let labels: Vec<_> = located.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["API", "Auth"]);
        assert_eq!(located.as_location().path(), "API/Auth/Login");
    }

    #[test]
    fn test_find_request_by_path_is_case_insensitive() {
        let (project, login_id) = sample();
        let located = project.find_request_by_path("api/AUTH/login").unwrap();
        assert_eq!(located.request.id, login_id);
        assert!(project.find_request_by_path("Login").is_none());
        assert!(project.find_request_by_path("API/Missing").is_none());
    }

    #[test]
    fn test_find_request_by_path_folds_non_ascii_case() {
        let request = Request::get("Überblick", "https://example.com");
        let id = request.id.clone();
        let project =
            Project::new("p").with_section(Section::new("Ünïcode").with_request(request));

        let located = project.find_request_by_path("ÜNÏCODE/überblick").unwrap();
        assert_eq!(located.request.id, id);
        assert!(project.find_section_by_path("ünïcode").is_some());
    }

    #[test]
    fn test_effective_security_walks_up() {
        let (project, login_id) = sample();
        let located = project.find_request(&login_id).unwrap();
        assert_eq!(
            located.as_location().effective_security(),
            SecurityEntity::bearer("root-token")
        );
    }

    #[test]
    fn test_effective_security_defaults_to_none() {
        let request = Request::get("x", "https://example.com");
        let section = Section::new("s");
        let chain = [&section];
        let location = RequestLocation {
            sections: &chain,
            request: &request,
        };
        assert_eq!(location.effective_security(), SecurityEntity::None);
    }

    #[test]
    fn test_own_security_overrides_sections() {
        let request = Request::get("x", "https://example.com").with_security(SecurityEntity::None);
        let section = Section::new("s").with_security(SecurityEntity::basic("u", "p"));
        let chain = [&section];
        let location = RequestLocation {
            sections: &chain,
            request: &request,
        };
        assert_eq!(location.effective_security(), SecurityEntity::None);
    }

    #[test]
    fn test_counts() {
        let (project, _) = sample();
        assert_eq!(project.request_count(), 2);
        assert_eq!(project.section_count(), 2);
    }

    #[test]
    fn test_remove_nested_request() {
        let (mut project, login_id) = sample();
        project.remove(&login_id).unwrap();
        assert_eq!(project.request_count(), 1);
        assert_eq!(
            project.remove(&login_id),
            Err(DomainError::UnknownItem(login_id))
        );
    }

    #[test]
    fn test_duplicate_section_renumbers_everything() {
        let (project, login_id) = sample();
        let copy = project.sections[0].duplicate();
        assert_eq!(copy.label, "API (copy)");
        assert_ne!(copy.id, project.sections[0].id);
        assert_eq!(copy.sections[0].label, "Auth");
        assert_ne!(copy.sections[0].requests[0].id, login_id);
        assert_eq!(copy.sections[0].requests[0].url, "https://<<host>>/login");
    }

    #[test]
    fn test_section_mut_adds_request() {
        let (mut project, _) = sample();
        let auth_id = project.sections[0].sections[0].id.clone();
        project
            .section_mut(&auth_id)
            .unwrap()
            .requests
            .push(Request::get("Logout", "https://<<host>>/logout"));
        assert_eq!(project.request_count(), 3);
    }

    #[test]
    fn test_duplicate_in_place() {
        let (mut project, login_id) = sample();
        let copy_id = project.duplicate(&login_id).unwrap();
        let auth = &project.sections[0].sections[0];
        let labels: Vec<_> = auth.requests.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Login", "Login (copy)"]);
        assert_eq!(auth.requests[1].id, copy_id);

        let top = project.sections[0].id.clone();
        project.duplicate(&top).unwrap();
        assert_eq!(project.sections.len(), 2);
        assert_eq!(project.sections[1].label, "API (copy)");
        assert!(project.duplicate("missing").is_err());
    }

    #[test]
    fn test_find_section_by_path() {
        let (project, _) = sample();
        let auth = project.find_section_by_path("api / auth").unwrap();
        assert_eq!(auth.label, "Auth");
        assert!(project.find_section_by_path("Auth").is_none());
        assert!(project.find_section_by_path("").is_none());
    }
}
