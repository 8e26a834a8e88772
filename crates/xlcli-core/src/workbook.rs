//! The workbook capability interface
//!
//! [`Workbook`] is the narrow seam between the service layer and whatever
//! spreadsheet library does the real work. Everything the tool does to a
//! file goes through these methods, so a different backend only has to
//! implement this trait.

use crate::address::{CellAddress, CellRange};
use crate::error::{Error, Result};
use crate::MAX_SHEET_NAME_LEN;
use std::fmt;
use std::path::Path;

/// Characters Excel does not allow in sheet names
pub const INVALID_SHEET_NAME_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// The content stored in a single cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellContent {
    /// Nothing stored
    #[default]
    Empty,
    /// Text, including text that only looks like a number
    Text(String),
    /// A number, as its stored text
    Number(String),
    /// A boolean
    Bool(bool),
    /// A formula, always with exactly one leading `=`
    Formula(String),
}

impl CellContent {
    /// Build a formula content, normalizing the leading `=`
    pub fn formula(text: &str) -> Self {
        CellContent::Formula(normalize_formula(text))
    }

    /// Whether the cell holds a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }

    /// Whether the cell holds nothing
    pub fn is_empty(&self) -> bool {
        match self {
            CellContent::Empty => true,
            CellContent::Text(v) | CellContent::Number(v) => v.is_empty(),
            CellContent::Bool(_) | CellContent::Formula(_) => false,
        }
    }

    /// The literal text of the cell: the value, or the formula text
    pub fn as_text(&self) -> &str {
        match self {
            CellContent::Empty => "",
            CellContent::Bool(true) => "TRUE",
            CellContent::Bool(false) => "FALSE",
            CellContent::Text(v) | CellContent::Number(v) | CellContent::Formula(v) => v,
        }
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Prepend `=` to a formula unless it already starts with one
///
/// ```
/// use xlcli_core::normalize_formula;
///
/// assert_eq!(normalize_formula("SUM(A1:A3)"), "=SUM(A1:A3)");
/// assert_eq!(normalize_formula("=SUM(A1:A3)"), "=SUM(A1:A3)");
/// ```
pub fn normalize_formula(text: &str) -> String {
    let text = text.trim_start();
    if text.starts_with('=') {
        text.to_string()
    } else {
        format!("={}", text)
    }
}

/// Check a sheet name against Excel's naming rules
///
/// Uniqueness is not checked here; that needs the workbook.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_argument("Sheet name cannot be empty."));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidArgument(format!(
            "Sheet name too long (max {} characters).",
            MAX_SHEET_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(Error::InvalidArgument(format!(
            "Sheet name cannot contain '{}'.",
            c
        )));
    }
    Ok(())
}

/// Operations the tool needs from a spreadsheet library
///
/// Sheet lookups by name are exact; implementations return
/// [`Error::SheetNotFound`] when a named sheet is missing. Name collision
/// and last-sheet rules are enforced by the caller.
pub trait Workbook: Sized {
    /// Open an existing workbook from disk
    fn open(path: &Path) -> Result<Self>;

    /// Create a workbook with no sheets
    fn new_empty() -> Self;

    /// Write the workbook to `path`, replacing any existing file
    fn save(&self, path: &Path) -> Result<()>;

    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Whether a sheet with exactly this name exists
    fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|n| n == name)
    }

    /// Number of sheets
    fn sheet_count(&self) -> usize {
        self.sheet_names().len()
    }

    /// Append an empty sheet
    fn add_sheet(&mut self, name: &str) -> Result<()>;

    /// Remove a sheet
    fn remove_sheet(&mut self, name: &str) -> Result<()>;

    /// Rename a sheet in place
    fn rename_sheet(&mut self, old: &str, new: &str) -> Result<()>;

    /// Append a copy of sheet `name` to `target` under `new_name`
    ///
    /// The copy keeps values, formulas, cell styles, column widths, row
    /// heights and merged ranges.
    fn copy_sheet_to(&self, name: &str, target: &mut Self, new_name: &str) -> Result<()>;

    /// The stored content of a cell
    fn cell(&self, sheet: &str, at: CellAddress) -> Result<CellContent>;

    /// Store a literal value, dropping any formula the cell had
    fn set_value(&mut self, sheet: &str, at: CellAddress, value: &str) -> Result<()>;

    /// Store a formula; `formula` may or may not start with `=`
    fn set_formula(&mut self, sheet: &str, at: CellAddress, formula: &str) -> Result<()>;

    /// The calculated value of a cell as text
    fn evaluate(&self, sheet: &str, at: CellAddress) -> Result<String>;

    /// Bounding box of all non-empty cells, `None` for an empty sheet
    fn used_range(&self, sheet: &str) -> Result<Option<CellRange>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_formula() {
        assert_eq!(normalize_formula("A1+B1"), "=A1+B1");
        assert_eq!(normalize_formula("=A1+B1"), "=A1+B1");
        assert_eq!(normalize_formula(&normalize_formula("A1")), "=A1");
    }

    #[test]
    fn test_cell_content_text() {
        assert_eq!(CellContent::Empty.as_text(), "");
        assert_eq!(CellContent::Number("42".into()).to_string(), "42");
        assert_eq!(CellContent::Bool(false).as_text(), "FALSE");
        assert_eq!(CellContent::formula("SUM(A1:A3)").as_text(), "=SUM(A1:A3)");
        assert!(CellContent::Text(String::new()).is_empty());
        assert!(!CellContent::formula("1").is_empty());
    }

    #[test]
    fn test_invalid_sheet_name() {
        assert!(validate_sheet_name("Data").is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name("   ").is_err());
        assert!(validate_sheet_name("Sheet/1").is_err());
        assert!(validate_sheet_name("Sheet:1").is_err());
        assert!(validate_sheet_name("Sheet[1]").is_err());
        assert!(validate_sheet_name("Why?").is_err());

        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(validate_sheet_name(&long_name).is_err());
        let max_name = "A".repeat(MAX_SHEET_NAME_LEN);
        assert!(validate_sheet_name(&max_name).is_ok());
    }
}
