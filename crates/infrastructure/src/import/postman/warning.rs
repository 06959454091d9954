//! Import Warning System
//!
//! Every lossy or suspicious mapping decision produces an [`ImportWarning`]
//! rather than failing the whole import. The exporter reuses the same
//! vocabulary for the things a Postman collection cannot carry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Informational - feature was skipped but not critical
    Info,
    /// Warning - imported, but something was backfilled or dropped
    Warning,
    /// Error - part of an item could not be imported
    Error,
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// An import warning or issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportWarning {
    /// Path to the problematic item (e.g., "collection/folder/request")
    pub path: String,
    /// Human-readable description of the issue
    pub message: String,
    /// Severity level
    pub severity: WarningSeverity,
}

impl ImportWarning {
    /// Create a new warning
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level entry
    pub fn info(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Info)
    }

    /// Create a warning-level entry
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Warning)
    }

    /// Create an error-level entry
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Error)
    }

    /// Check if this is an error
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, WarningSeverity::Error)
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.path, self.message)
    }
}

/// Per-severity counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningStats {
    /// Count of informational entries
    pub info_count: usize,
    /// Count of warning-level entries
    pub warning_count: usize,
    /// Count of error-level entries
    pub error_count: usize,
}

impl WarningStats {
    /// Calculate stats from a list of warnings
    #[must_use]
    pub fn from_warnings(warnings: &[ImportWarning]) -> Self {
        warnings.iter().fold(Self::default(), |mut stats, w| {
            stats.record(w.severity);
            stats
        })
    }

    /// Counts one more entry of `severity`.
    pub const fn record(&mut self, severity: WarningSeverity) {
        match severity {
            WarningSeverity::Info => self.info_count += 1,
            WarningSeverity::Warning => self.warning_count += 1,
            WarningSeverity::Error => self.error_count += 1,
        }
    }

    /// Total count of all entries
    #[must_use]
    pub const fn total(&self) -> usize {
        self.info_count + self.warning_count + self.error_count
    }

    /// Check if there are any errors
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

impl fmt::Display for WarningStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s), {} warning(s), {} info",
            self.error_count, self.warning_count, self.info_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_warning_display() {
        let warning = ImportWarning::warning("Pets/List", "missing bearer token");
        assert_eq!(warning.to_string(), "[warning] Pets/List: missing bearer token");
        assert!(!warning.is_error());
    }

    #[test]
    fn test_warning_stats() {
        let warnings = vec![
            ImportWarning::info("a", "info"),
            ImportWarning::warning("b", "warn"),
            ImportWarning::warning("c", "warn"),
            ImportWarning::error("d", "err"),
        ];

        let stats = WarningStats::from_warnings(&warnings);
        assert_eq!(
            stats,
            WarningStats {
                info_count: 1,
                warning_count: 2,
                error_count: 1,
            }
        );
        assert_eq!(stats.total(), 4);
        assert!(stats.has_errors());
        assert_eq!(stats.to_string(), "1 error(s), 2 warning(s), 1 info");
    }

    #[test]
    fn test_empty_stats() {
        let stats = WarningStats::from_warnings(&[]);
        assert_eq!(stats.total(), 0);
        assert!(!stats.has_errors());
    }
}
