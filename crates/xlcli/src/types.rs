//! Result types returned by the service

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Local};
use xlcli_core::{CellAddress, Error, Result};

/// Facts about a workbook file
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    /// File name without directories
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time, local timezone
    pub modified: DateTime<Local>,
    /// Number of worksheets
    pub sheet_count: usize,
}

/// A worksheet and the dimensions of its used range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub name: String,
    /// Rows in the used range, 0 for an empty sheet
    pub rows: u32,
    /// Columns in the used range, 0 for an empty sheet
    pub columns: u32,
}

/// A cell that matched a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLocation {
    pub sheet: String,
    pub address: CellAddress,
    pub value: String,
}

/// External data formats for import and export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Pick the format from a file extension (`.csv`, `.json`, any case)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            "" => Err(Error::UnsupportedFormat(format!(
                "'{}' has no file extension",
                path.display()
            ))),
            other => Err(Error::UnsupportedFormat(format!(".{}", other))),
        }
    }

    /// Upper-case label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            DataFormat::Csv => "CSV",
            DataFormat::Json => "JSON",
        }
    }
}

impl FromStr for DataFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("csv") {
            Ok(DataFormat::Csv)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(DataFormat::Json)
        } else {
            Err(Error::UnsupportedFormat(s.to_string()))
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Csv => f.write_str("csv"),
            DataFormat::Json => f.write_str("json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("csv".parse::<DataFormat>().unwrap(), DataFormat::Csv);
        assert_eq!("JSON".parse::<DataFormat>().unwrap(), DataFormat::Json);
        assert_eq!("Csv".parse::<DataFormat>().unwrap().label(), "CSV");
        assert!(matches!(
            "xml".parse::<DataFormat>(),
            Err(Error::UnsupportedFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DataFormat::from_path(Path::new("in.csv")).unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::from_path(Path::new("IN.JSON")).unwrap(), DataFormat::Json);
        assert!(matches!(
            DataFormat::from_path(Path::new("data.txt")),
            Err(Error::UnsupportedFormat(e)) if e == ".txt"
        ));
        assert!(DataFormat::from_path(Path::new("noext")).is_err());
    }
}
