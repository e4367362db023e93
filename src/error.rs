use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Structural problem found in a single source row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row_index}: {field}: {message}")]
pub struct RowError {
    /// Sheet row (1-indexed) when known, otherwise the position within the file.
    pub row_index: u32,
    pub field: String,
    pub message: String,
}

/// Error type covering the different failure cases that can occur while a
/// batch of inspection spreadsheets is ingested, validated, merged, or
/// exported.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when an upload does not carry an accepted extension.
    #[error("unsupported file type for '{file_name}', expected one of: {expected}")]
    FileType { file_name: String, expected: String },

    /// Raised when an upload exceeds the configured size limit.
    #[error("file '{file_name}' is {size} bytes, limit is {limit} bytes")]
    FileSize {
        file_name: String,
        size: usize,
        limit: usize,
    },

    /// Raised when no data rows survive header and footer filtering.
    #[error("no data rows found in '{0}'")]
    EmptyFile(String),

    /// Raised when one or more rows fail structural validation.
    #[error("{} row(s) failed validation, first: {}", .0.len(), first_row_error(.0))]
    Validation(Vec<RowError>),

    /// Raised when the summary report could not be serialised.
    #[error("report export failed: {0}")]
    Export(String),

    /// Raised when a batch leaves nothing to aggregate.
    #[error("no valid files to aggregate")]
    NoValidFiles,

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the report configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

fn first_row_error(errors: &[RowError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}
