//! Text rendering for command output

use std::fmt;

use chrono::{DateTime, Local};
use xlcli::{FileInfo, SheetInfo};
use xlcli_codec::CsvWriteOptions;

/// How `read-range` prints its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFormat {
    Table,
    Csv,
    Json,
}

impl RangeFormat {
    pub const NAMES: [&'static str; 3] = ["table", "csv", "json"];

    /// Parse a format name, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "table" => Some(RangeFormat::Table),
            "csv" => Some(RangeFormat::Csv),
            "json" => Some(RangeFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for RangeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RangeFormat::Table => "table",
            RangeFormat::Csv => "csv",
            RangeFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Human-readable byte count: `512 B`, `1.5 KB`, `2 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut len = bytes as f64;
    let mut order = 0;
    while len >= 1024.0 && order < UNITS.len() - 1 {
        order += 1;
        len /= 1024.0;
    }

    let mut number = format!("{:.2}", len);
    while number.ends_with('0') {
        number.pop();
    }
    if number.ends_with('.') {
        number.pop();
    }
    format!("{} {}", number, UNITS[order])
}

pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `  - Name (R rows x C columns)`
pub fn sheet_line(sheet: &SheetInfo) -> String {
    format!(
        "  - {} ({} rows x {} columns)",
        sheet.name, sheet.rows, sheet.columns
    )
}

/// The `read-file` report
pub fn file_report(info: &FileInfo, sheets: &[SheetInfo]) -> String {
    let mut lines = vec![
        format!("File: {}", info.name),
        format!("Size: {}", format_file_size(info.size)),
        format!("Last Modified: {}", format_timestamp(&info.modified)),
        format!("Number of Sheets: {}", info.sheet_count),
        String::new(),
        "Sheets:".to_string(),
    ];
    lines.extend(sheets.iter().map(sheet_line));
    lines.join("\n")
}

/// Render range rows in the requested format, without a trailing newline
pub fn render_rows(rows: &[Vec<String>], format: RangeFormat) -> anyhow::Result<String> {
    let text = match format {
        RangeFormat::Table => rows
            .iter()
            .map(|row| row.join(" | "))
            .collect::<Vec<_>>()
            .join("\n"),
        RangeFormat::Csv => {
            let mut out = Vec::new();
            xlcli_codec::write_csv(&mut out, rows, &CsvWriteOptions::default())?;
            let mut text = String::from_utf8(out)?;
            if text.ends_with('\n') {
                text.pop();
            }
            text
        }
        RangeFormat::Json => serde_json::to_string_pretty(rows)?,
    };
    Ok(text)
}
