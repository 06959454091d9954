//! Section-scoped variables.
//!
//! A variable is referenced in request text as `<<name>>`. Names are
//! restricted to an allow-list of characters so that the token can be found
//! by plain substring search.

use serde::{Deserialize, Serialize};

/// Opening delimiter of a variable token.
pub const TOKEN_OPEN: &str = "<<";
/// Closing delimiter of a variable token.
pub const TOKEN_CLOSE: &str = ">>";

/// A key/disabled/value triple defined on a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, with or without the `<<` `>>` wrapper.
    pub key: String,
    /// Whether the variable is switched off.
    #[serde(default)]
    pub disabled: bool,
    /// Substituted value.
    #[serde(default)]
    pub value: String,
}

impl Variable {
    /// Creates an enabled variable.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            disabled: false,
            value: value.into(),
        }
    }

    /// Creates a disabled variable.
    #[must_use]
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            disabled: true,
            value: value.into(),
        }
    }

    /// The `<<name>>` token for this variable, if its name is valid.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        normalize_key(&self.key)
    }
}

/// Returns true if `c` may appear in a variable name.
#[must_use]
pub const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Normalizes a raw key to its `<<name>>` token.
///
/// Surrounding whitespace and an existing `<<` `>>` wrapper are stripped.
/// Returns `None` when the remaining name is empty or contains a character
/// outside `[A-Za-z0-9_.-]`.
///
/// # Examples
///
/// ```
/// use wirepad_domain::normalize_key;
///
/// assert_eq!(normalize_key(" host ").as_deref(), Some("<<host>>"));
/// assert_eq!(normalize_key("<<api.key>>").as_deref(), Some("<<api.key>>"));
/// assert_eq!(normalize_key("bad name"), None);
/// ```
#[must_use]
pub fn normalize_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let name = trimmed
        .strip_prefix(TOKEN_OPEN)
        .and_then(|rest| rest.strip_suffix(TOKEN_CLOSE))
        .unwrap_or(trimmed)
        .trim();

    if name.is_empty() || !name.chars().all(is_name_char) {
        return None;
    }
    Some(format!("{TOKEN_OPEN}{name}{TOKEN_CLOSE}"))
}
