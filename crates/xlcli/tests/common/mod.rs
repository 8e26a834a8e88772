//! Shared fixtures for service tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use xlcli::{CellAddress, SpreadsheetService, Workbook, XlsxWorkbook};

/// A scratch directory holding a workbook built from `(sheet, rows)` pairs
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
    pub service: SpreadsheetService,
}

impl Fixture {
    pub fn new(sheets: &[(&str, &[&[&str]])]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_workbook(&path, sheets);
        Self {
            dir,
            path,
            service: SpreadsheetService::new(),
        }
    }

    /// A path inside the fixture directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read(&self, sheet: &str, cell: &str) -> String {
        self.service.read_cell(&self.path, sheet, cell).unwrap()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        sheet_names(&self.path)
    }
}

/// Write a workbook with the given sheets; rows start at A1
pub fn write_workbook(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut book = XlsxWorkbook::new_empty();
    for (name, rows) in sheets {
        book.add_sheet(name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    let at = CellAddress::new(c as u32 + 1, r as u32 + 1);
                    book.set_value(name, at, value).unwrap();
                }
            }
        }
    }
    book.save(path).unwrap();
}

pub fn sheet_names(path: &Path) -> Vec<String> {
    XlsxWorkbook::open(path).unwrap().sheet_names()
}

pub fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}
