//! Staged file acceptance checks.

use std::path::PathBuf;

use crate::error::FileError;

/// Maximum accepted file size in bytes (100 MiB).
pub const MAX_FILE_BYTES: u64 = 104_857_600;

/// File extensions accepted for staging.
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

/// A file staged for metadata extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Filesystem path the file is read from.
    pub path: PathBuf,
    /// Display name used in metadata and error messages.
    pub name: String,
    /// Size in bytes as reported by the filesystem.
    pub size_bytes: u64,
}

impl StagedFile {
    /// Stat a path and stage it for validation.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::ReadFailed`] if the file's metadata cannot be
    /// queried.
    pub async fn from_path(path: impl Into<PathBuf>) -> Result<Self, FileError> {
        let path = path.into();
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| FileError::ReadFailed {
                file: name.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            path,
            name,
            size_bytes: meta.len(),
        })
    }
}

/// Check a staged file's name and size against the acceptance rules.
///
/// Only the name and size are consulted; the file content is never read.
///
/// # Errors
///
/// Returns [`FileError::UnsupportedType`] for extensions outside
/// [`ALLOWED_EXTENSIONS`], or [`FileError::TooLarge`] for files over
/// [`MAX_FILE_BYTES`].
pub fn validate(file_name: &str, size_bytes: u64) -> Result<(), FileError> {
    let lower = file_name.to_lowercase();
    let allowed = ALLOWED_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")));
    if !allowed {
        return Err(FileError::UnsupportedType {
            file: file_name.to_string(),
        });
    }

    if size_bytes > MAX_FILE_BYTES {
        return Err(FileError::TooLarge {
            file: file_name.to_string(),
            size_bytes,
            limit_bytes: MAX_FILE_BYTES,
        });
    }

    Ok(())
}
