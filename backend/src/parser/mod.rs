//! Loading uploaded files into tables.
//!
//! [`load`] picks the reader strictly from the declared extension; the bytes
//! are never sniffed. CSV input goes through encoding auto-detection first,
//! workbooks are read with `calamine`.

pub mod csv_reader;
pub mod xlsx_reader;

use crate::error::{PipelineError, PipelineResult};
use crate::format::{normalize_extension, Format};
use crate::table::Table;

pub use csv_reader::{parse_csv_bytes, parse_csv_str};
pub use xlsx_reader::parse_xlsx_bytes;

/// Parse `bytes` according to `extension` (`.csv` or `.xlsx`).
///
/// Any other extension fails with [`PipelineError::UnsupportedFormat`]
/// carrying the normalised extension, e.g. `".txt"`.
pub fn load(bytes: &[u8], extension: &str) -> PipelineResult<Table> {
    let format = Format::from_extension(extension)
        .ok_or_else(|| PipelineError::UnsupportedFormat(normalize_extension(extension)))?;

    let table = match format {
        Format::Csv => parse_csv_bytes(bytes)?,
        Format::Excel => parse_xlsx_bytes(bytes)?,
    };
    Ok(table)
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as is; anything else is handed to chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let (charset, _confidence, _language) = chardet::detect(bytes);
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" | "" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Unknown labels fall back to windows-1252, which maps every byte.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let encoding = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .unwrap_or(encoding_rs::WINDOWS_1252);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, DataType};

    #[test]
    fn test_load_dispatches_csv() {
        let table = load(b"a,b\n1,x\n", ".CSV").unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.column("a").unwrap().dtype(), DataType::Integer);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = load(b"a,b\n1,2\n", ".txt").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(ref ext) if ext == ".txt"));

        let err = load(b"", "").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(ref ext) if ext.is_empty()));
    }

    #[test]
    fn test_load_does_not_sniff_content() {
        // CSV bytes under an .xlsx name are a broken workbook, not a CSV.
        let err = load(b"a,b\n1,2\n", ".xlsx").unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[test]
    fn test_detect_utf8() {
        assert_eq!(detect_encoding("name\nSociété".as_bytes()), "utf-8");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        assert_eq!(decode_content(bytes, "iso-8859-1"), "Société");
    }

    #[test]
    fn test_load_latin1_csv() {
        let mut bytes = b"name,qty\n".to_vec();
        bytes.extend_from_slice(&[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9]);
        bytes.extend_from_slice(b",3\n");

        let table = load(&bytes, ".csv").unwrap();
        let name = &table.column("name").unwrap().cells()[0];
        assert!(matches!(name, Cell::Text(s) if s.starts_with("Soci")));
        assert_eq!(table.column("qty").unwrap().cells(), &[Cell::Integer(3)]);
    }
}
