//! `.wrp` project store.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use wirepad_application::ports::{FileSystem, FileSystemError, ProjectStore};
use wirepad_application::{ApplicationError, ApplicationResult};
use wirepad_domain::Project;

use super::wrp::{FORMAT_TAG, SCHEMA_VERSION, WrpFile, WrpHeader};
use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// Errors reading or writing a `.wrp` file.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// File access failed.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// The file is not valid JSON for the expected shape.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The `format` field is not ours.
    #[error("not a Wirepad project file (format '{0}')")]
    UnknownFormat(String),

    /// The file was written by a newer or unknown schema.
    #[error("unsupported project schema version {0}")]
    UnsupportedVersion(u32),
}

impl From<PersistenceError> for ApplicationError {
    fn from(error: PersistenceError) -> Self {
        match error {
            PersistenceError::FileSystem(FileSystemError::NotFound(path)) => {
                Self::NotFound(path.display().to_string())
            }
            other => Self::Storage(other.to_string()),
        }
    }
}

/// Project store writing one JSON `.wrp` file per project.
///
/// Saves go to a sibling temp file first and are renamed into place.
#[derive(Debug, Clone, Default)]
pub struct WrpProjectStore<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> WrpProjectStore<F> {
    /// Creates a store over the given file system.
    #[must_use]
    pub const fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Reads and decodes a project file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the file is missing, malformed, or
    /// carries the wrong format tag or schema version.
    pub async fn read(&self, path: &Path) -> Result<Project, PersistenceError> {
        let bytes = self.fs.read_file(path).await?;
        decode(&bytes)
    }

    /// Encodes and writes a project file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if encoding or writing fails.
    pub async fn write(&self, project: &Project, path: &Path) -> Result<(), PersistenceError> {
        let bytes = encode(project)?;
        let temp = temp_path(path);
        self.fs.write_file(&temp, &bytes).await?;
        self.fs.rename(&temp, path).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "project file written");
        Ok(())
    }
}

impl<F: FileSystem> ProjectStore for WrpProjectStore<F> {
    async fn load(&self, path: &Path) -> ApplicationResult<Project> {
        let project = self.read(path).await?;
        info!(
            path = %path.display(),
            sections = project.section_count(),
            requests = project.request_count(),
            "project loaded"
        );
        Ok(project)
    }

    async fn save(&self, project: &Project, path: &Path) -> ApplicationResult<()> {
        self.write(project, path).await?;
        info!(path = %path.display(), "project saved");
        Ok(())
    }
}

/// Encodes a project as `.wrp` bytes.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(project: &Project) -> Result<Vec<u8>, PersistenceError> {
    Ok(to_json_stable_bytes(&WrpFile::new(project))?)
}

/// Decodes `.wrp` bytes.
///
/// # Errors
///
/// Returns an error for malformed JSON, a foreign format tag or an unknown
/// schema version.
pub fn decode(bytes: &[u8]) -> Result<Project, PersistenceError> {
    let header: WrpHeader = from_json_bytes(bytes)?;
    if header.format != FORMAT_TAG {
        return Err(PersistenceError::UnknownFormat(header.format));
    }
    if header.schema_version != SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion(header.schema_version));
    }

    let file: WrpFile = from_json_bytes(bytes)?;
    Ok(file.project.into())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
