//! # xlcli
//!
//! Spreadsheet operations behind the `excel-cli` tool.
//!
//! Each method of [`SpreadsheetService`] opens a workbook, performs one
//! operation and saves the file if the operation changed it. Errors are
//! reported through [`Error`]; nothing is saved on failure.
//!
//! ## Features
//!
//! - File and sheet summaries
//! - Reading and writing cells and ranges
//! - Formula insertion and evaluation
//! - Creating, deleting, renaming and copying sheets
//! - Case-insensitive search
//! - CSV and JSON import and export
//!
//! ## Example
//!
//! ```rust,no_run
//! use xlcli::prelude::*;
//!
//! let service = SpreadsheetService::new();
//!
//! service.write_cell("data.xlsx", "Sheet1", "A1", "Hello")?;
//! service.insert_formula("data.xlsx", "Sheet1", "B1", "LEN(A1)")?;
//!
//! assert_eq!(service.get_cell_value("data.xlsx", "Sheet1", "B1")?, "5");
//! # Ok::<(), xlcli::Error>(())
//! ```

pub mod prelude;
pub mod service;
pub mod types;

pub use service::{SpreadsheetService, MAX_READ_CELLS};
pub use types::{CellLocation, DataFormat, FileInfo, SheetInfo};

// Re-export core types
pub use xlcli_core::{
    CellAddress, CellContent, CellRange, Error, Result, Workbook, XlsxWorkbook,
};
