//! Prelude module for convenient imports
//!
//! ```rust
//! use xlcli::prelude::*;
//! ```

pub use crate::service::SpreadsheetService;
pub use crate::types::{CellLocation, DataFormat, FileInfo, SheetInfo};
pub use xlcli_core::{CellAddress, CellRange, Error, Result, Workbook, XlsxWorkbook};
