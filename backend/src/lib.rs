//! # Datasweeper - CSV/Excel cleaning and conversion
//!
//! Datasweeper loads uploaded CSV and Excel files into typed tables, removes
//! duplicate rows, fills missing numeric values with the column mean, keeps a
//! chosen set of columns and exports the result as CSV or Excel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ .csv / .xlsx│────▶│   Parser    │────▶│  Transform  │────▶│   Export    │
//! │   (bytes)   │     │  (auto-enc) │     │ (clean/cols)│     │ (csv/xlsx)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use datasweeper::{process_file, FileJob, Format, ProcessOptions};
//!
//! let job = FileJob::new("sales.xlsx", std::fs::read("sales.xlsx")?);
//! let options = ProcessOptions {
//!     deduplicate: true,
//!     fill_missing: true,
//!     target: Format::Csv,
//!     ..Default::default()
//! };
//! let converted = process_file(&job, &options)?;
//! converted.write_to(std::path::Path::new("."))?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`table`] - Typed in-memory tables and previews
//! - [`format`] - Supported file formats
//! - [`parser`] - CSV and Excel loading
//! - [`transform`] - Cleaning, projection and the file pipeline
//! - [`export`] - CSV and Excel writers
//! - [`api`] - HTTP API server and log broadcasting

// Core modules
pub mod error;
pub mod format;
pub mod table;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Export
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ExportError,
    ParseError,
    PipelineError,
    ServerError,
    TableError,
};

// =============================================================================
// Re-exports - Table model
// =============================================================================

pub use format::Format;
pub use table::{
    preview,
    Cell,
    Column,
    ColumnSummary,
    DataType,
    Table,
    TablePreview,
    DEFAULT_PREVIEW_ROWS,
};

// =============================================================================
// Re-exports - Loading and export
// =============================================================================

pub use parser::{
    load,
    parse_csv_bytes,
    parse_xlsx_bytes,
    detect_encoding,
    decode_content,
};

pub use export::{export, Exported};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    deduplicate,
    fill_missing_numeric,
    project,
    process_file,
    process_batch,
    preview_file,
    output_file_name,
    BatchReport,
    ConvertedFile,
    FileJob,
    FileOutcome,
    ProcessOptions,
};

// =============================================================================
// Re-exports - Server
// =============================================================================

pub mod server {
    pub use crate::api::server::start_server;
}
