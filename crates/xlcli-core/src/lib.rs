//! # xlcli-core
//!
//! Core types for the xlcli spreadsheet tool.
//!
//! This crate provides:
//! - [`CellAddress`] and [`CellRange`] - A1 addressing
//! - [`Workbook`] - the capability interface the service layer talks to
//! - [`XlsxWorkbook`] - the `.xlsx` backend (umya-spreadsheet, with
//!   formualizer for evaluation)
//! - [`Error`] - the error taxonomy shared by every operation
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlcli_core::{CellAddress, Workbook, XlsxWorkbook};
//!
//! let mut wb = XlsxWorkbook::open(Path::new("data.xlsx"))?;
//! wb.set_value("Sheet1", CellAddress::parse("A1")?, "Hello")?;
//! wb.save(Path::new("data.xlsx"))?;
//! # Ok::<(), xlcli_core::Error>(())
//! ```

pub mod address;
pub mod calculation;
pub mod error;
pub mod workbook;
pub mod xlsx;

pub use address::{CellAddress, CellRange};
pub use error::{Error, Result};
pub use workbook::{
    normalize_formula, validate_sheet_name, CellContent, Workbook, INVALID_SHEET_NAME_CHARS,
};
pub use xlsx::XlsxWorkbook;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
