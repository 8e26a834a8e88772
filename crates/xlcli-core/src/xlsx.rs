//! XLSX backend built on umya-spreadsheet

use std::path::Path;

use log::debug;
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::address::{CellAddress, CellRange};
use crate::calculation;
use crate::error::{Error, Result};
use crate::workbook::{CellContent, Workbook};

/// An `.xlsx` workbook held in memory
pub struct XlsxWorkbook {
    book: Spreadsheet,
}

impl XlsxWorkbook {
    fn sheet(&self, name: &str) -> Result<&Worksheet> {
        self.book
            .get_sheet_by_name(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.book
            .get_sheet_by_name_mut(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    fn sheet_index(&self, name: &str) -> Result<usize> {
        self.book
            .get_sheet_collection_no_check()
            .iter()
            .position(|s| s.get_name() == name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }
}

impl Workbook for XlsxWorkbook {
    fn open(path: &Path) -> Result<Self> {
        debug!("Opening workbook {}", path.display());
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(Error::engine)?;
        Ok(Self { book })
    }

    fn new_empty() -> Self {
        Self {
            book: umya_spreadsheet::new_file_empty_worksheet(),
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        debug!("Saving workbook {}", path.display());
        umya_spreadsheet::writer::xlsx::write(&self.book, path).map_err(Error::engine)
    }

    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection_no_check()
            .iter()
            .map(|s| s.get_name().to_string())
            .collect()
    }

    fn add_sheet(&mut self, name: &str) -> Result<()> {
        self.book.new_sheet(name.to_string()).map_err(Error::engine)?;
        Ok(())
    }

    fn remove_sheet(&mut self, name: &str) -> Result<()> {
        self.sheet_index(name)?;
        self.book.remove_sheet_by_name(name).map_err(Error::engine)
    }

    fn rename_sheet(&mut self, old: &str, new: &str) -> Result<()> {
        let index = self.sheet_index(old)?;
        self.book
            .set_sheet_name(index, new.to_string())
            .map_err(Error::engine)?;
        Ok(())
    }

    fn copy_sheet_to(&self, name: &str, target: &mut Self, new_name: &str) -> Result<()> {
        let source = self.sheet(name)?;
        let dest = target
            .book
            .new_sheet(new_name.to_string())
            .map_err(Error::engine)?;

        let mut copied = 0usize;
        for cell in source.get_cell_collection() {
            let col = *cell.get_coordinate().get_col_num();
            let row = *cell.get_coordinate().get_row_num();

            let dest_cell = dest.get_cell_mut((col, row));
            dest_cell.set_style(cell.get_style().clone());
            if cell.is_formula() {
                dest_cell.set_formula(cell.get_formula().to_string());
                dest_cell.set_formula_result_default("");
            } else {
                dest_cell.set_value(cell.get_value().to_string());
            }
            copied += 1;
        }

        for column in source.get_column_dimensions() {
            *dest.get_column_dimension_by_number_mut(column.get_col_num()) = column.clone();
        }
        for row in source.get_row_dimensions() {
            *dest.get_row_dimension_mut(row.get_row_num()) = row.clone();
        }
        for merged in source.get_merge_cells() {
            dest.add_merge_cells(merged.get_range());
        }

        debug!("Copied {} cells from '{}' to '{}'", copied, name, new_name);
        Ok(())
    }

    fn cell(&self, sheet: &str, at: CellAddress) -> Result<CellContent> {
        let content = match self.sheet(sheet)?.get_cell((at.col, at.row)) {
            None => CellContent::Empty,
            Some(cell) if cell.is_formula() => CellContent::formula(cell.get_formula()),
            Some(cell) => {
                let value = cell.get_value().to_string();
                if value.is_empty() {
                    CellContent::Empty
                } else {
                    match cell.get_data_type() {
                        "n" => CellContent::Number(value),
                        "b" => CellContent::Bool(value.eq_ignore_ascii_case("TRUE")),
                        _ => CellContent::Text(value),
                    }
                }
            }
        };
        Ok(content)
    }

    fn set_value(&mut self, sheet: &str, at: CellAddress, value: &str) -> Result<()> {
        let cell = self.sheet_mut(sheet)?.get_cell_mut((at.col, at.row));
        cell.get_cell_value_mut().remove_formula();

        // Only store a number when it reads back as the same text, so a
        // written value always round-trips ("1.50" and "007" stay strings).
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n.to_string() == value => {
                cell.set_value_number(n);
            }
            _ => {
                cell.set_value_string(value.to_string());
            }
        }
        Ok(())
    }

    fn set_formula(&mut self, sheet: &str, at: CellAddress, formula: &str) -> Result<()> {
        let formula = formula.trim_start();
        let body = formula.strip_prefix('=').unwrap_or(formula);
        self.sheet_mut(sheet)?
            .get_cell_mut((at.col, at.row))
            .set_formula(body.to_string());
        Ok(())
    }

    fn evaluate(&self, sheet: &str, at: CellAddress) -> Result<String> {
        calculation::evaluate_cell(self, sheet, at)
    }

    fn used_range(&self, sheet: &str) -> Result<Option<CellRange>> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;

        for cell in self.sheet(sheet)?.get_cell_collection() {
            if !cell.is_formula() && cell.get_value().is_empty() {
                continue;
            }
            let col = *cell.get_coordinate().get_col_num();
            let row = *cell.get_coordinate().get_row_num();
            bounds = Some(match bounds {
                None => (col, row, col, row),
                Some((min_col, min_row, max_col, max_row)) => (
                    min_col.min(col),
                    min_row.min(row),
                    max_col.max(col),
                    max_row.max(row),
                ),
            });
        }

        Ok(bounds.map(|(min_col, min_row, max_col, max_row)| {
            CellRange::new(
                CellAddress::new(min_col, min_row),
                CellAddress::new(max_col, max_row),
            )
        }))
    }
}
