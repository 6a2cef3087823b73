//! Error types for the Datasweeper pipeline.
//!
//! Errors are grouped by the stage that raises them:
//!
//! - [`ParseError`] - decoding uploaded bytes into a table
//! - [`TableError`] - table construction and column lookup
//! - [`ExportError`] - serializing a table into an output buffer
//! - [`PipelineError`] - top-level, file-scoped errors returned to callers
//! - [`ServerError`] - HTTP handler errors
//!
//! Every lower-level error converts into [`PipelineError`] so `?` works
//! across stage boundaries. All of them are scoped to a single file: a batch
//! reports them and moves on to the next file.

use thiserror::Error;

use crate::table::DataType;

// =============================================================================
// Parse Errors
// =============================================================================

/// Errors while decoding raw bytes as a CSV file or an Excel workbook.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The CSV reader rejected the input.
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook could not be opened or read.
    #[error("Malformed workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// Nothing to parse (no bytes, or no header row).
    #[error("No columns to parse from file")]
    Empty,

    /// A data row has more fields than the header.
    #[error("Line {line}: expected {expected} fields, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A spreadsheet cell holds an error value such as `#DIV/0!`.
    #[error("Cell {cell} holds a spreadsheet error: {detail}")]
    CellError { cell: String, detail: String },

    /// The workbook contains no worksheet.
    #[error("Workbook has no worksheet")]
    NoWorksheet,
}

// =============================================================================
// Table Errors
// =============================================================================

/// Errors raised while building or querying a [`crate::table::Table`].
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    /// Two columns share a name.
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A column's length differs from the table's row count.
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A cell does not match its column's data type.
    #[error("Column '{column}' row {row}: value is not {expected}")]
    TypeMismatch {
        column: String,
        row: usize,
        expected: DataType,
    },

    /// A requested column is not part of the table.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while encoding a table into an output buffer.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing to the in-memory buffer failed.
    #[error("Export IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV writer failed.
    #[error("CSV writer error: {0}")]
    Csv(#[from] csv::Error),

    /// Building the workbook archive failed.
    #[error("Workbook archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// File-scoped errors returned by the load → clean → project → export pipeline.
///
/// None of these are fatal: batch callers record them against the file and
/// continue with the next one.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The file extension is neither `.csv` nor `.xlsx`.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The bytes could not be decoded as the declared format.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A projection named a column the table does not have.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// The table violated a structural invariant.
    #[error("Invalid table: {0}")]
    Table(TableError),

    /// Serializing the result failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl From<TableError> for PipelineError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::UnknownColumn(name) => PipelineError::UnknownColumn(name),
            other => PipelineError::Table(other),
        }
    }
}

impl PipelineError {
    /// Short machine-readable tag, used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::UnsupportedFormat(_) => "unsupported_format",
            PipelineError::Parse(_) => "parse_error",
            PipelineError::UnknownColumn(_) => "unknown_column",
            PipelineError::Table(_) => "invalid_table",
            PipelineError::Export(_) => "export_error",
        }
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error for the uploaded file.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for export.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ParseError -> PipelineError
        let pipeline_err: PipelineError = ParseError::Empty.into();
        assert_eq!(pipeline_err.kind(), "parse_error");
        assert!(pipeline_err.to_string().contains("No columns"));

        // ExportError -> PipelineError
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let pipeline_err: PipelineError = ExportError::Io(io).into();
        assert_eq!(pipeline_err.kind(), "export_error");
    }

    #[test]
    fn test_unknown_column_is_lifted() {
        let err: PipelineError = TableError::UnknownColumn("price".into()).into();
        assert!(matches!(err, PipelineError::UnknownColumn(ref name) if name == "price"));
        assert_eq!(err.to_string(), "Unknown column: price");

        let err: PipelineError = TableError::DuplicateColumn("id".into()).into();
        assert!(matches!(err, PipelineError::Table(_)));
    }

    #[test]
    fn test_ragged_row_format() {
        let err = ParseError::RaggedRow {
            line: 4,
            expected: 2,
            found: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 4"));
        assert!(msg.contains("expected 2"));
        assert!(msg.contains("saw 3"));
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = PipelineError::UnsupportedFormat(".txt".into());
        assert_eq!(err.to_string(), "Unsupported file format: .txt");
        assert_eq!(err.kind(), "unsupported_format");
    }
}
