//! Supported file formats, used both to pick a parser and as export target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Media type of an Office Open XML workbook.
pub const XLSX_MEDIA_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Media type of comma-separated text.
pub const CSV_MEDIA_TYPE: &str = "text/csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Csv,
    Excel,
}

impl Format {
    /// Match a file extension (`.csv`, `xlsx`, ...). Case-insensitive; the
    /// leading dot is optional.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match normalize_extension(extension).as_str() {
            ".csv" => Some(Format::Csv),
            ".xlsx" => Some(Format::Excel),
            _ => None,
        }
    }

    /// Extension written on exported files, with its leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Csv => ".csv",
            Format::Excel => ".xlsx",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Format::Csv => CSV_MEDIA_TYPE,
            Format::Excel => XLSX_MEDIA_TYPE,
        }
    }
}

/// Lowercase an extension and make sure it starts with a dot.
pub fn normalize_extension(extension: &str) -> String {
    let lower = extension.trim().to_lowercase();
    if lower.is_empty() || lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Csv => f.write_str("csv"),
            Format::Excel => f.write_str("excel"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "excel" | "xlsx" => Ok(Format::Excel),
            other => Err(format!("unknown format '{}' (expected csv or excel)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Format::from_extension(".csv"), Some(Format::Csv));
        assert_eq!(Format::from_extension("XLSX"), Some(Format::Excel));
        assert_eq!(Format::from_extension(".xls"), None);
        assert_eq!(Format::from_extension(""), None);
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("TXT"), ".txt");
        assert_eq!(normalize_extension(".Csv"), ".csv");
        assert_eq!(normalize_extension(""), "");
    }

    #[test]
    fn test_media_types() {
        assert_eq!(Format::Csv.media_type(), "text/csv");
        assert_eq!(
            Format::Excel.media_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn test_parse_target_name() {
        assert_eq!("Excel".parse::<Format>(), Ok(Format::Excel));
        assert_eq!("xlsx".parse::<Format>(), Ok(Format::Excel));
        assert_eq!("csv".parse::<Format>(), Ok(Format::Csv));
        assert!("parquet".parse::<Format>().is_err());
    }
}
