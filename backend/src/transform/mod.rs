//! Table transformations.
//!
//! - Cleaning: duplicate removal, numeric mean imputation
//! - Projection: column selection
//! - Pipeline: per-file and batch processing

pub mod cleaning;
pub mod pipeline;
pub mod projection;

pub use cleaning::{column_mean, deduplicate, fill_missing_numeric};
pub use pipeline::*;
pub use projection::project;
