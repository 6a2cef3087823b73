//! File and batch processing: load → clean → project → export.
//!
//! # Example
//!
//! ```rust,ignore
//! use datasweeper::{process_batch, FileJob, Format, ProcessOptions};
//!
//! let jobs = vec![FileJob::new("sales.xlsx", std::fs::read("sales.xlsx")?)];
//! let options = ProcessOptions {
//!     deduplicate: true,
//!     fill_missing: true,
//!     target: Format::Csv,
//!     ..Default::default()
//! };
//!
//! let report = process_batch(&jobs, &options);
//! for file in report.converted() {
//!     std::fs::write(&file.file_name, &file.bytes)?;
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_success_indent, log_warning};
use crate::error::{PipelineError, PipelineResult};
use crate::export::{export, Exported};
use crate::format::Format;
use crate::parser::load;
use crate::table::{preview, Table, TablePreview};

use super::cleaning::{deduplicate, fill_missing_numeric};
use super::projection::project;

/// Per-file processing choices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessOptions {
    /// Remove duplicate rows
    pub deduplicate: bool,

    /// Mean-fill missing numeric values (after deduplication)
    pub fill_missing: bool,

    /// Columns to keep, in order. Empty keeps every column.
    pub columns: Vec<String>,

    /// Output format
    pub target: Format,
}

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct FileJob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileJob {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// A successfully converted file, ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    /// Name of the uploaded file
    pub source_name: String,
    /// Download name, e.g. `converted_sales.csv`
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
    pub row_count: usize,
    pub column_count: usize,
}

impl ConvertedFile {
    /// Write the artifact into `dir` under its download name.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Result for one file of a batch.
#[derive(Debug)]
pub enum FileOutcome {
    Converted(ConvertedFile),
    Failed {
        file_name: String,
        error: PipelineError,
    },
}

/// Outcomes of a batch, in upload order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn converted(&self) -> impl Iterator<Item = &ConvertedFile> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Converted(file) => Some(file),
            FileOutcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &PipelineError)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { file_name, error } => Some((file_name.as_str(), error)),
            FileOutcome::Converted(_) => None,
        })
    }

    pub fn converted_count(&self) -> usize {
        self.converted().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }
}

/// Lowercase extension of `file_name` with its leading dot, or `""`.
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Download name for a converted file: `converted_<base><target ext>`.
pub fn output_file_name(file_name: &str, target: Format) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    format!("converted_{}{}", stem, target.extension())
}

/// `file_name`, or `<stem>_<n><ext>` with the first free `n` when `taken`
/// already holds it. The returned name is added to `taken`.
pub fn unique_file_name(file_name: &str, taken: &mut HashSet<String>) -> String {
    let mut name = file_name.to_string();
    if taken.contains(&name) {
        let path = Path::new(file_name);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let mut n = 1;
        while taken.contains(&name) {
            name = format!("{}_{}{}", stem, n, ext);
            n += 1;
        }
    }
    taken.insert(name.clone());
    name
}

/// Parse an uploaded file, choosing the reader from its name.
pub fn load_file(job: &FileJob) -> PipelineResult<Table> {
    load(&job.bytes, &file_extension(&job.file_name))
}

/// Apply the requested cleaning steps. Deduplication always runs first so
/// means are computed over the de-duplicated rows.
pub fn clean(mut table: Table, options: &ProcessOptions) -> Table {
    if options.deduplicate {
        let before = table.row_count();
        table = deduplicate(table);
        log_success_indent(
            format!("Duplicates removed: {} rows dropped", before - table.row_count()),
            1,
        );
    }

    if options.fill_missing {
        let before = table.missing_numeric_count();
        table = fill_missing_numeric(table);
        let left = table.missing_numeric_count();
        log_success_indent(format!("Missing values filled: {}", before - left), 1);
        if left > 0 {
            log_warning(format!("{} missing values left in columns with no numeric data", left));
        }
    }

    table
}

/// Clean, then keep the selected columns (all of them when none are selected).
pub fn transform_table(table: Table, options: &ProcessOptions) -> PipelineResult<Table> {
    let table = clean(table, options);
    if options.columns.is_empty() {
        return Ok(table);
    }
    Ok(project(table, &options.columns)?)
}

/// Clean, project and encode an already loaded table.
pub fn process_table(table: Table, options: &ProcessOptions) -> PipelineResult<Exported> {
    let table = transform_table(table, options)?;
    Ok(export(&table, options.target)?)
}

/// Run the whole pipeline for one file.
pub fn process_file(job: &FileJob, options: &ProcessOptions) -> PipelineResult<ConvertedFile> {
    log_info(format!("📄 {} ({} bytes)", job.file_name, job.bytes.len()));

    let table = load_file(job)?;
    log_info_indent(
        format!("Loaded {} rows x {} columns", table.row_count(), table.column_count()),
        1,
    );

    let table = transform_table(table, options)?;
    let exported = export(&table, options.target)?;

    let converted = ConvertedFile {
        source_name: job.file_name.clone(),
        file_name: output_file_name(&job.file_name, options.target),
        media_type: exported.media_type,
        row_count: table.row_count(),
        column_count: table.column_count(),
        bytes: exported.into_bytes(),
    };
    log_success_indent(
        format!("Converted to {} ({} bytes)", converted.file_name, converted.bytes.len()),
        1,
    );
    Ok(converted)
}

/// Process every file in order. A failing file is recorded and never stops
/// the ones after it. Converted files get distinct download names, so
/// `a.csv` and `a.xlsx` do not both become `converted_a.csv`.
pub fn process_batch(jobs: &[FileJob], options: &ProcessOptions) -> BatchReport {
    let mut report = BatchReport::default();
    let mut taken = HashSet::with_capacity(jobs.len());

    for job in jobs {
        let outcome = match process_file(job, options) {
            Ok(mut file) => {
                let name = unique_file_name(&file.file_name, &mut taken);
                if name != file.file_name {
                    log_warning(format!("{} already used, writing {}", file.file_name, name));
                    file.file_name = name;
                }
                FileOutcome::Converted(file)
            }
            Err(error) => {
                log_error(format!("Error processing file {}: {}", job.file_name, error));
                FileOutcome::Failed {
                    file_name: job.file_name.clone(),
                    error,
                }
            }
        };
        report.outcomes.push(outcome);
    }

    if report.failed_count() == 0 {
        log_success(format!("All {} files processed", report.converted_count()));
    } else {
        log_warning(format!(
            "{} converted, {} failed",
            report.converted_count(),
            report.failed_count()
        ));
    }
    report
}

/// Load one file and summarise it.
pub fn preview_file(job: &FileJob, rows: usize) -> PipelineResult<TablePreview> {
    let table = load_file(job)?;
    Ok(preview(&table, rows))
}
