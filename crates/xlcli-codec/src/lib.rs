//! # xlcli-codec
//!
//! CSV and JSON encoding of row grids, used by sheet import and export.
//!
//! Rows are plain `Vec<String>`; the codec knows nothing about workbooks.

pub mod delimited;
pub mod error;
pub mod json;
pub mod options;

pub use delimited::{read_csv, write_csv};
pub use error::{CodecError, CodecResult};
pub use json::{read_json, write_json};
pub use options::{CsvReadOptions, CsvWriteOptions, JsonWriteOptions, LineTerminator};
