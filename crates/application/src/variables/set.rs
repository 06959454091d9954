//! Ordered variable table built from a section chain.

use std::collections::HashSet;

use tracing::{debug, warn};
use wirepad_domain::{Section, Variable, normalize_key};

/// Ordered `<<name>>` → value table.
///
/// Insertion order is substitution order. The first definition of a key wins;
/// later ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    entries: Vec<(String, String)>,
    warnings: Vec<String>,
}

impl VariableSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Builds the table visible to a request.
    ///
    /// `sections` is the ancestor chain, outermost first. The innermost
    /// section is read first so its definitions shadow outer ones.
    #[must_use]
    pub fn for_sections(sections: &[&Section]) -> Self {
        let mut set = Self::new();
        for section in sections.iter().rev() {
            set.extend_from_section(section);
        }
        set
    }

    /// Adds the enabled variables of one section.
    ///
    /// Invalid names are skipped with a warning. A key defined twice within
    /// the section keeps its first value and logs a warning; a key already
    /// defined by an inner section is shadowed silently.
    pub fn extend_from_section(&mut self, section: &Section) {
        let mut seen_here = HashSet::new();
        for variable in section.variables.iter().filter(|v| !v.disabled) {
            let Some(token) = normalize_key(&variable.key) else {
                self.warn(format!(
                    "section '{}': invalid variable name '{}' skipped",
                    section.label, variable.key
                ));
                continue;
            };
            if !seen_here.insert(token.clone()) {
                self.warn(format!(
                    "section '{}': duplicate variable {token} ignored, first definition kept",
                    section.label
                ));
                continue;
            }
            if self.contains(&token) {
                debug!(section = %section.label, %token, "variable shadowed by inner section");
                continue;
            }
            self.entries.push((token, variable.value.clone()));
        }
    }

    /// Adds one variable unless its key is invalid or already present.
    ///
    /// Returns true if the variable was added.
    pub fn insert(&mut self, variable: &Variable) -> bool {
        if variable.disabled {
            return false;
        }
        let Some(token) = normalize_key(&variable.key) else {
            self.warn(format!("invalid variable name '{}' skipped", variable.key));
            return false;
        };
        if self.contains(&token) {
            return false;
        }
        self.entries.push((token, variable.value.clone()));
        true
    }

    /// Returns the value for a key, given raw or as a token.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let token = normalize_key(key)?;
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates `(token, value)` pairs in substitution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Warnings produced while building the set.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Number of usable variables.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no variable is usable.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains(&self, token: &str) -> bool {
        self.entries.iter().any(|(t, _)| t == token)
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }
}
