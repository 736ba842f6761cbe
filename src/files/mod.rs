//! Staged file gating and bounded metadata extraction.
//!
//! Files never have their full content read here. Validation consults only
//! name and size; metadata extraction reads at most the first 50 KiB.

mod metadata;
mod validate;

pub use metadata::{
    extract, extract_all, FileMetadata, RowCount, EXCEL_COLUMNS_PLACEHOLDER, MAX_SAMPLE_ROWS,
    METADATA_PREFIX_BYTES, PARSE_ERROR_SENTINEL,
};
pub use validate::{validate, StagedFile, ALLOWED_EXTENSIONS, MAX_FILE_BYTES};
