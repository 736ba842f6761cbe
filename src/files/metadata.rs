//! Bounded metadata extraction from staged files.

use futures_util::future::try_join_all;
use tokio::io::AsyncReadExt;

use crate::error::FileError;

use super::StagedFile;

/// Number of bytes inspected from the start of each file (50 KiB).
pub const METADATA_PREFIX_BYTES: u64 = 51_200;

/// Maximum number of sample rows carried in metadata.
pub const MAX_SAMPLE_ROWS: usize = 3;

/// Column sentinel recorded when a CSV prefix is not parseable text.
pub const PARSE_ERROR_SENTINEL: &str = "error reading file";

/// Column placeholder for spreadsheet formats that are not parsed locally.
pub const EXCEL_COLUMNS_PLACEHOLDER: &str = "Excel file (columns not extracted)";

/// Row count derived from a file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    /// Data rows counted in the inspected prefix.
    Known(u64),
    /// The format is not counted locally.
    Unknown,
}

impl std::fmt::Display for RowCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(count) => write!(f, "{count}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Structural summary of a staged file, derived from its first 50 KiB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Display name of the file.
    pub file_name: String,
    /// Ordered column names (CSV), or a placeholder/sentinel entry.
    pub columns: Vec<String>,
    /// Data rows observed in the prefix, or unknown for non-CSV formats.
    pub row_count: RowCount,
    /// Up to three sample rows, comma-split like the header.
    pub sample_rows: Vec<Vec<String>>,
}

impl FileMetadata {
    /// Derive metadata from a file name and a raw content prefix.
    ///
    /// Decoding is lossy; the prefix boundary may split a multi-byte
    /// character. CSV fields are naively comma-split, so quoted fields that
    /// contain commas come out wrong. The result only feeds a prompt
    /// preview, where that is an acceptable trade for never reading the
    /// full file.
    ///
    /// Unparseable content never errors here: a `.csv` prefix containing
    /// NUL bytes yields [`PARSE_ERROR_SENTINEL`] as its only column.
    #[must_use]
    pub fn from_prefix(file_name: &str, prefix: &[u8]) -> Self {
        let text = String::from_utf8_lossy(prefix);
        let lines: Vec<&str> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();

        if lines.is_empty() {
            return Self {
                file_name: file_name.to_string(),
                columns: Vec::new(),
                row_count: RowCount::Known(0),
                sample_rows: Vec::new(),
            };
        }

        if !file_name.to_lowercase().ends_with(".csv") {
            return Self {
                file_name: file_name.to_string(),
                columns: vec![EXCEL_COLUMNS_PLACEHOLDER.to_string()],
                row_count: RowCount::Unknown,
                sample_rows: Vec::new(),
            };
        }

        if prefix.contains(&0) {
            return Self {
                file_name: file_name.to_string(),
                columns: vec![PARSE_ERROR_SENTINEL.to_string()],
                row_count: RowCount::Known(0),
                sample_rows: Vec::new(),
            };
        }

        let columns = split_fields(lines[0]);
        let sample_rows = lines[1..]
            .iter()
            .take(MAX_SAMPLE_ROWS)
            .map(|line| split_fields(line))
            .collect();

        Self {
            file_name: file_name.to_string(),
            columns,
            row_count: RowCount::Known((lines.len() - 1) as u64),
            sample_rows,
        }
    }
}

/// Split a CSV line on commas, trimming whitespace and surrounding quotes.
fn split_fields(line: &str) -> Vec<String> {
    line.split(',')
        .map(|field| {
            field
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
                .to_string()
        })
        .collect()
}

/// Read the prefix of a staged file and derive its metadata.
///
/// # Errors
///
/// Returns [`FileError::ReadFailed`] if the file cannot be opened or read.
/// Content that merely fails to parse never errors; it is captured in the
/// metadata itself (see [`FileMetadata::from_prefix`]).
pub async fn extract(file: &StagedFile) -> Result<FileMetadata, FileError> {
    let handle = tokio::fs::File::open(&file.path)
        .await
        .map_err(|e| FileError::ReadFailed {
            file: file.name.clone(),
            message: e.to_string(),
        })?;

    let mut prefix = Vec::new();
    let mut reader = handle.take(METADATA_PREFIX_BYTES);
    reader
        .read_to_end(&mut prefix)
        .await
        .map_err(|e| FileError::ReadFailed {
            file: file.name.clone(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        file = %file.name,
        prefix_bytes = prefix.len(),
        "Read file prefix for metadata"
    );

    Ok(FileMetadata::from_prefix(&file.name, &prefix))
}

/// Extract metadata for all staged files concurrently.
///
/// The reads run as independent futures joined in input order, so the
/// returned metadata lines up with `files` regardless of completion order.
///
/// # Errors
///
/// Returns the first [`FileError`] produced by any read.
pub async fn extract_all(files: &[StagedFile]) -> Result<Vec<FileMetadata>, FileError> {
    try_join_all(files.iter().map(extract)).await
}
