//! Postman Importer - Main Import Logic
//!
//! Validation, preview and full import of Postman collections (v2.0 and
//! v2.1) and environments. Import produces domain values only; saving the
//! resulting project is left to the caller.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use wirepad_domain::{Project, Section};

use super::environment_types::PostmanEnvironment;
use super::mapper::Mapper;
use super::types::{PostmanCollection, PostmanItem};
use super::warning::{ImportWarning, WarningStats};

/// Import configuration options
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Maximum file size in bytes (default: 10MB)
    pub max_file_size: usize,
    /// Maximum folder nesting depth before flattening (default: 10)
    pub max_depth: usize,
    /// Maximum number of items (requests + folders) (default: 1000)
    pub max_items: usize,
    /// Keep going when items produce error entries (default: true)
    pub skip_on_error: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            max_depth: 10,
            max_items: 1000,
            skip_on_error: true,
        }
    }
}

/// Import error types
#[derive(Debug, Error)]
pub enum ImportError {
    /// File was not found at the specified path
    #[error("File not found: {0}")]
    FileNotFound(String),
    /// File exceeds the maximum allowed size
    #[error("File too large: {size} bytes exceeds maximum of {max} bytes")]
    FileTooLarge {
        /// Actual file size in bytes
        size: usize,
        /// Maximum allowed size in bytes
        max: usize,
    },
    /// JSON parsing failed
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    /// File is not a usable Postman document
    #[error("Invalid Postman format: {0}")]
    InvalidFormat(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Too many items in the collection
    #[error("Too many items: {count} exceeds maximum of {max}")]
    TooManyItems {
        /// Actual item count
        count: usize,
        /// Maximum allowed items
        max: usize,
    },
    /// Import was aborted because items produced errors
    #[error("Import aborted: {0}")]
    Aborted(WarningStats),
}

/// Detected import format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImportFormat {
    /// Postman Collection v2.0
    PostmanCollectionV20,
    /// Postman Collection v2.1
    PostmanCollectionV21,
    /// Postman Environment
    PostmanEnvironment,
    /// Unknown or unsupported format
    Unknown,
}

impl ImportFormat {
    /// Human readable name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PostmanCollectionV20 => "Postman Collection v2.0",
            Self::PostmanCollectionV21 => "Postman Collection v2.1",
            Self::PostmanEnvironment => "Postman Environment",
            Self::Unknown => "Unknown",
        }
    }

    /// True for either collection version
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::PostmanCollectionV20 | Self::PostmanCollectionV21)
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of validating a file before import
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether the file is valid for import
    pub is_valid: bool,
    /// Detected format of the file
    pub format: ImportFormat,
    /// List of validation issues found
    pub issues: Vec<String>,
}

/// Preview of what will be imported
#[derive(Debug, Clone, Serialize)]
pub struct ImportPreview {
    /// Detected format
    pub format: ImportFormat,
    /// Collection or environment name
    pub name: String,
    /// Number of requests to be imported
    pub request_count: usize,
    /// Number of sections to be created, the root section included
    pub section_count: usize,
    /// Number of variables to be imported
    pub variable_count: usize,
    /// Warnings the import would produce
    pub warnings: Vec<ImportWarning>,
    /// Per-severity counts of `warnings`
    pub stats: WarningStats,
}

/// Result of a successful import
#[derive(Debug)]
pub struct ImportReport {
    /// The imported project
    pub project: Project,
    /// Every issue found while mapping
    pub warnings: Vec<ImportWarning>,
    /// Per-severity counts of `warnings`
    pub stats: WarningStats,
}

/// Result of importing an environment on its own
#[derive(Debug)]
pub struct EnvironmentReport {
    /// Section holding only the environment's variables
    pub section: Section,
    /// Every issue found while mapping
    pub warnings: Vec<ImportWarning>,
    /// Per-severity counts of `warnings`
    pub stats: WarningStats,
}

enum Document {
    Collection(ImportFormat, Box<PostmanCollection>),
    Environment(PostmanEnvironment),
}

/// Main Postman importer
#[derive(Debug, Default)]
pub struct PostmanImporter {
    config: ImportConfig,
}

impl PostmanImporter {
    /// Create a new importer with default config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new importer with custom config
    #[must_use]
    pub const fn with_config(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Reads an import file, enforcing the size limit before reading it.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::FileNotFound`], [`ImportError::FileTooLarge`]
    /// or [`ImportError::Io`].
    pub async fn read_file(&self, path: &Path) -> Result<String, ImportError> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ImportError::FileNotFound(path.display().to_string())
            } else {
                ImportError::Io(e)
            }
        })?;
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > self.config.max_file_size {
            return Err(ImportError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }
        Ok(tokio::fs::read_to_string(path).await?)
    }

    /// Validate content before importing
    #[must_use]
    pub fn validate(&self, content: &str) -> ValidationResult {
        let format = serde_json::from_str::<Value>(strip_bom(content))
            .map_or(ImportFormat::Unknown, |json| Self::detect_format(&json));

        match self.parse(content) {
            Ok(_) => ValidationResult {
                is_valid: true,
                format,
                issues: Vec::new(),
            },
            Err(e) => ValidationResult {
                is_valid: false,
                format,
                issues: vec![e.to_string()],
            },
        }
    }

    /// Preview what will be imported without building the final report
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be parsed as a Postman
    /// collection or environment.
    pub fn preview(&self, content: &str) -> Result<ImportPreview, ImportError> {
        let (format, project, warnings) = match self.parse(content)? {
            Document::Collection(format, collection) => {
                let (project, warnings) = self.mapper().map_collection(&collection);
                (format, project, warnings)
            }
            Document::Environment(environment) => {
                let (section, warnings) = self.mapper().map_environment(&environment);
                let project = Project::new(section.label.clone()).with_section(section);
                (ImportFormat::PostmanEnvironment, project, warnings)
            }
        };

        Ok(ImportPreview {
            format,
            name: project.label.clone(),
            request_count: project.request_count(),
            section_count: project.section_count(),
            variable_count: count_variables(&project.sections),
            stats: WarningStats::from_warnings(&warnings),
            warnings,
        })
    }

    /// Import a collection or environment into a new project
    ///
    /// A collection becomes a project with one root section. An environment
    /// becomes a project whose only section holds its variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be parsed, exceeds a configured
    /// limit, or produced error entries while `skip_on_error` is off.
    pub fn import(&self, content: &str) -> Result<ImportReport, ImportError> {
        let (project, warnings) = match self.parse(content)? {
            Document::Collection(format, collection) => {
                info!(%format, name = %collection.info.name, "Importing Postman collection");
                self.mapper().map_collection(&collection)
            }
            Document::Environment(environment) => {
                info!(name = %environment.name, "Importing Postman environment");
                let (section, warnings) = self.mapper().map_environment(&environment);
                let project = Project::new(section.label.clone()).with_section(section);
                (project, warnings)
            }
        };

        let stats = self.check(&warnings)?;
        info!(
            requests = project.request_count(),
            sections = project.section_count(),
            errors = stats.error_count,
            warnings = stats.warning_count,
            infos = stats.info_count,
            "Postman import finished"
        );
        Ok(ImportReport {
            project,
            warnings,
            stats,
        })
    }

    /// Import an environment as a single variables-only section
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidFormat`] when the content is a collection
    /// or is not a Postman document at all.
    pub fn import_environment(&self, content: &str) -> Result<EnvironmentReport, ImportError> {
        let Document::Environment(environment) = self.parse(content)? else {
            return Err(ImportError::InvalidFormat(
                "expected a Postman environment, found a collection".to_string(),
            ));
        };

        let (section, warnings) = self.mapper().map_environment(&environment);
        let stats = self.check(&warnings)?;
        info!(
            name = %section.label,
            variables = section.variables.len(),
            warnings = stats.warning_count,
            "Postman environment import finished"
        );
        Ok(EnvironmentReport {
            section,
            warnings,
            stats,
        })
    }

    /// Detect the document type from its JSON shape
    #[must_use]
    pub fn detect_format(json: &Value) -> ImportFormat {
        if let Some(info) = json.get("info") {
            let schema = info.get("schema").and_then(Value::as_str).unwrap_or("");
            if schema.contains("v2.0") {
                return ImportFormat::PostmanCollectionV20;
            }
            if schema.contains("v2.1") || json.get("item").is_some() {
                return ImportFormat::PostmanCollectionV21;
            }
            return ImportFormat::Unknown;
        }

        // Environments have "name" and "values" but no "info"
        if json.get("name").is_some() && json.get("values").is_some() {
            return ImportFormat::PostmanEnvironment;
        }

        ImportFormat::Unknown
    }

    fn parse(&self, content: &str) -> Result<Document, ImportError> {
        if content.len() > self.config.max_file_size {
            return Err(ImportError::FileTooLarge {
                size: content.len(),
                max: self.config.max_file_size,
            });
        }

        let json: Value = serde_json::from_str(strip_bom(content))
            .map_err(|e| ImportError::InvalidJson(e.to_string()))?;

        match Self::detect_format(&json) {
            format @ (ImportFormat::PostmanCollectionV20 | ImportFormat::PostmanCollectionV21) => {
                let collection: PostmanCollection = serde_json::from_value(json)
                    .map_err(|e| ImportError::InvalidFormat(e.to_string()))?;
                let count = count_items(&collection.item);
                if count > self.config.max_items {
                    return Err(ImportError::TooManyItems {
                        count,
                        max: self.config.max_items,
                    });
                }
                Ok(Document::Collection(format, Box::new(collection)))
            }
            ImportFormat::PostmanEnvironment => serde_json::from_value(json)
                .map(Document::Environment)
                .map_err(|e| ImportError::InvalidFormat(e.to_string())),
            ImportFormat::Unknown => Err(ImportError::InvalidFormat(
                "not a Postman collection (v2.0/v2.1) or environment".to_string(),
            )),
        }
    }

    const fn mapper(&self) -> Mapper {
        Mapper::new(self.config.max_depth)
    }

    fn check(&self, warnings: &[ImportWarning]) -> Result<WarningStats, ImportError> {
        let stats = WarningStats::from_warnings(warnings);
        if stats.has_errors() && !self.config.skip_on_error {
            warn!(%stats, "Import aborted");
            return Err(ImportError::Aborted(stats));
        }
        Ok(stats)
    }
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

fn count_items(items: &[PostmanItem]) -> usize {
    items
        .iter()
        .map(|item| 1 + item.item.as_deref().map_or(0, count_items))
        .sum()
}

fn count_variables(sections: &[Section]) -> usize {
    sections
        .iter()
        .map(|s| s.variables.len() + count_variables(&s.sections))
        .sum()
}
