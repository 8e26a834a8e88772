//! The spreadsheet service
//!
//! Every operation opens the workbook, does one thing and, if it changed
//! anything, saves it back. Nothing is saved when an operation fails, so a
//! failed call leaves the file on disk untouched.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::marker::PhantomData;
use std::path::Path;

use chrono::{DateTime, Local};
use log::{debug, info};
use xlcli_codec::{CsvReadOptions, CsvWriteOptions, JsonWriteOptions};
use xlcli_core::{
    normalize_formula, validate_sheet_name, CellAddress, CellRange, Error, Result, Workbook,
    XlsxWorkbook,
};

use crate::types::{CellLocation, DataFormat, FileInfo, SheetInfo};

/// Most cells a single `read_range` call will return
pub const MAX_READ_CELLS: u64 = 1_000_000;

/// Spreadsheet operations over a [`Workbook`] backend
///
/// The backend defaults to [`XlsxWorkbook`]; tests or other file formats can
/// plug in any type implementing the trait.
pub struct SpreadsheetService<W = XlsxWorkbook> {
    backend: PhantomData<fn() -> W>,
}

impl SpreadsheetService<XlsxWorkbook> {
    /// Create a service for `.xlsx` files
    pub fn new() -> Self {
        Self::with_backend()
    }
}

impl Default for SpreadsheetService<XlsxWorkbook> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Workbook> SpreadsheetService<W> {
    /// Create a service for a specific backend
    pub fn with_backend() -> Self {
        Self {
            backend: PhantomData,
        }
    }

    /// File name, size, modification time and sheet count
    pub fn read_file_info<P: AsRef<Path>>(&self, path: P) -> Result<FileInfo> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Reading file info for {}", path.display());

        let metadata = std::fs::metadata(path)?;
        let book = W::open(path)?;

        Ok(FileInfo {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: metadata.len(),
            modified: DateTime::<Local>::from(metadata.modified()?),
            sheet_count: book.sheet_count(),
        })
    }

    /// All sheets in workbook order with their used dimensions
    pub fn list_sheets<P: AsRef<Path>>(&self, path: P) -> Result<Vec<SheetInfo>> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Listing sheets in {}", path.display());

        let book = W::open(path)?;
        let mut sheets = Vec::new();
        for name in book.sheet_names() {
            let (rows, columns) = match book.used_range(&name)? {
                Some(range) => (range.row_count(), range.col_count()),
                None => (0, 0),
            };
            sheets.push(SheetInfo {
                name,
                rows,
                columns,
            });
        }
        Ok(sheets)
    }

    /// The stored content of a cell; formulas come back as `=...`
    pub fn read_cell<P: AsRef<Path>>(&self, path: P, sheet: &str, cell: &str) -> Result<String> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Reading {}!{} from {}", sheet, cell, path.display());

        let book = W::open(path)?;
        ensure_sheet(&book, sheet)?;
        let content = book.cell(sheet, CellAddress::parse(cell)?)?;
        Ok(content.as_text().to_string())
    }

    /// The calculated value of a cell
    pub fn get_cell_value<P: AsRef<Path>>(
        &self,
        path: P,
        sheet: &str,
        cell: &str,
    ) -> Result<String> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Evaluating {}!{} in {}", sheet, cell, path.display());

        let book = W::open(path)?;
        ensure_sheet(&book, sheet)?;
        book.evaluate(sheet, CellAddress::parse(cell)?)
    }

    /// The stored contents of a range, one `Vec` per row
    ///
    /// Ranges larger than [`MAX_READ_CELLS`] are rejected.
    pub fn read_range<P: AsRef<Path>>(
        &self,
        path: P,
        sheet: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Reading {}!{} from {}", sheet, range, path.display());

        let book = W::open(path)?;
        ensure_sheet(&book, sheet)?;
        let range = CellRange::parse(range)?;
        let cells = u64::from(range.row_count()) * u64::from(range.col_count());
        if cells > MAX_READ_CELLS {
            return Err(Error::InvalidArgument(format!(
                "Range {} has {} cells; at most {} can be read at once.",
                range.to_a1_string(),
                cells,
                MAX_READ_CELLS
            )));
        }
        read_grid(&book, sheet, &range)
    }

    /// Store a literal value in a cell, replacing any formula
    pub fn write_cell<P: AsRef<Path>>(
        &self,
        path: P,
        sheet: &str,
        cell: &str,
        value: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Writing {}!{} in {}", sheet, cell, path.display());

        let mut book = W::open(path)?;
        ensure_sheet(&book, sheet)?;
        book.set_value(sheet, CellAddress::parse(cell)?, value)?;
        book.save(path)
    }

    /// Write rows into a range, anchored at its top-left cell
    ///
    /// Rows and columns that do not fit in the range are dropped. Returns the
    /// number of rows written.
    pub fn write_range<P: AsRef<Path>>(
        &self,
        path: P,
        sheet: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<usize> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Writing {}!{} in {}", sheet, range, path.display());

        let mut book = W::open(path)?;
        ensure_sheet(&book, sheet)?;
        let range = CellRange::parse(range)?;

        let mut written = 0;
        for (targets, values) in range.rows().zip(rows) {
            for (at, value) in targets.into_iter().zip(values) {
                book.set_value(sheet, at, value)?;
            }
            written += 1;
        }
        if rows.len() > written {
            debug!(
                "Dropped {} row(s) that do not fit in {}",
                rows.len() - written,
                range
            );
        }

        book.save(path)?;
        Ok(written)
    }

    /// Append an empty sheet
    pub fn create_sheet<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<()> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Creating sheet '{}' in {}", name, path.display());

        let mut book = W::open(path)?;
        validate_sheet_name(name)?;
        ensure_name_free(&book, name, None)?;
        book.add_sheet(name)?;
        book.save(path)
    }

    /// Remove a sheet; the last sheet of a workbook cannot be removed
    pub fn delete_sheet<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<()> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Deleting sheet '{}' from {}", name, path.display());

        let mut book = W::open(path)?;
        if book.sheet_count() <= 1 {
            return Err(Error::invalid_operation(
                "Cannot delete the last worksheet in the workbook.",
            ));
        }
        ensure_sheet(&book, name)?;
        book.remove_sheet(name)?;
        book.save(path)
    }

    /// Rename a sheet in place
    pub fn rename_sheet<P: AsRef<Path>>(&self, path: P, old_name: &str, new_name: &str) -> Result<()> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!(
            "Renaming sheet '{}' to '{}' in {}",
            old_name,
            new_name,
            path.display()
        );

        let mut book = W::open(path)?;
        ensure_sheet(&book, old_name)?;
        validate_sheet_name(new_name)?;
        if new_name == old_name {
            return Err(Error::Conflict(new_name.to_string()));
        }
        ensure_name_free(&book, new_name, Some(old_name))?;
        book.rename_sheet(old_name, new_name)?;
        book.save(path)
    }

    /// Copy a sheet into another workbook, creating that workbook if needed
    ///
    /// The copy keeps the source name unless `new_name` is given and
    /// non-empty. Returns the name the copy ended up with.
    pub fn copy_sheet<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        sheet: &str,
        target: Q,
        new_name: Option<&str>,
    ) -> Result<String> {
        let source = source.as_ref();
        let target = target.as_ref();
        validate_file_path(source)?;
        if is_blank(target) {
            return Err(Error::invalid_argument("Target path cannot be empty."));
        }
        info!(
            "Copying sheet '{}' from {} to {}",
            sheet,
            source.display(),
            target.display()
        );

        let source_book = W::open(source)?;
        ensure_sheet(&source_book, sheet)?;

        let name = match new_name {
            Some(n) if !n.is_empty() => n,
            _ => sheet,
        };
        validate_sheet_name(name)?;

        let mut target_book = if target.exists() {
            W::open(target)?
        } else {
            debug!("{} does not exist, creating it", target.display());
            W::new_empty()
        };
        ensure_name_free(&target_book, name, None)?;

        source_book.copy_sheet_to(sheet, &mut target_book, name)?;
        target_book.save(target)?;
        Ok(name.to_string())
    }

    /// Search a sheet for cells containing `needle`, ignoring case
    ///
    /// Cells are visited row by row. Only the first match is returned unless
    /// `find_all` is set.
    pub fn find_value<P: AsRef<Path>>(
        &self,
        path: P,
        sheet: &str,
        needle: &str,
        find_all: bool,
    ) -> Result<Vec<CellLocation>> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Searching {} for '{}' in {}", sheet, needle, path.display());

        let book = W::open(path)?;
        ensure_sheet(&book, sheet)?;

        let mut matches = Vec::new();
        let Some(range) = book.used_range(sheet)? else {
            return Ok(matches);
        };

        let needle = needle.to_lowercase();
        for address in range.cells() {
            let content = book.cell(sheet, address)?;
            if content.is_empty() {
                continue;
            }
            if content.as_text().to_lowercase().contains(&needle) {
                matches.push(CellLocation {
                    sheet: sheet.to_string(),
                    address,
                    value: content.as_text().to_string(),
                });
                if !find_all {
                    break;
                }
            }
        }

        debug!("{} match(es) in {}", matches.len(), range);
        Ok(matches)
    }

    /// Write the used range of a sheet to `output` as CSV or JSON
    pub fn export_sheet<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        path: P,
        sheet: &str,
        output: Q,
        format: &str,
    ) -> Result<DataFormat> {
        let path = path.as_ref();
        let output = output.as_ref();
        validate_file_path(path)?;
        info!(
            "Exporting sheet '{}' from {} to {}",
            sheet,
            path.display(),
            output.display()
        );

        let book = W::open(path)?;
        ensure_sheet(&book, sheet)?;
        let range = book
            .used_range(sheet)?
            .ok_or_else(|| Error::invalid_operation("Worksheet is empty."))?;
        let format: DataFormat = format.parse()?;

        let rows = read_grid(&book, sheet, &range)?;
        debug!("Exporting {} ({} rows) as {}", range, rows.len(), format);

        let writer = BufWriter::new(File::create(output)?);
        match format {
            DataFormat::Csv => xlcli_codec::write_csv(writer, &rows, &CsvWriteOptions::default())?,
            DataFormat::Json => {
                xlcli_codec::write_json(writer, &rows, &JsonWriteOptions::default())?
            }
        }
        Ok(format)
    }

    /// Read a CSV or JSON file into a sheet starting at `start_cell`
    ///
    /// The format comes from the input's extension. JSON input must be an
    /// array of objects; the first object's keys are written as a header row.
    pub fn import_data<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        path: P,
        sheet: &str,
        input: Q,
        start_cell: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        let input = input.as_ref();
        validate_file_path(path)?;
        if !input.is_file() {
            return Err(Error::input_not_found(input));
        }
        info!(
            "Importing {} into sheet '{}' of {}",
            input.display(),
            sheet,
            path.display()
        );

        let mut book = W::open(path)?;
        ensure_sheet(&book, sheet)?;
        let format = DataFormat::from_path(input)?;
        let start = CellAddress::parse(start_cell)?;

        let reader = BufReader::new(File::open(input)?);
        let rows: Vec<Vec<Option<String>>> = match format {
            DataFormat::Csv => xlcli_codec::read_csv(reader, &CsvReadOptions::default())?
                .into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
            DataFormat::Json => xlcli_codec::read_json(reader)?,
        };
        debug!("Read {} row(s) of {}", rows.len(), format);

        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let Some(value) = value else {
                    continue;
                };
                let at = start.offset(to_u32(i)?, to_u32(j)?)?;
                book.set_value(sheet, at, value)?;
            }
        }

        book.save(path)
    }

    /// Store a formula in a cell, adding the leading `=` if missing
    pub fn insert_formula<P: AsRef<Path>>(
        &self,
        path: P,
        sheet: &str,
        cell: &str,
        formula: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        validate_file_path(path)?;
        info!("Inserting formula into {}!{} in {}", sheet, cell, path.display());

        let mut book = W::open(path)?;
        ensure_sheet(&book, sheet)?;
        let formula = normalize_formula(formula);
        book.set_formula(sheet, CellAddress::parse(cell)?, &formula)?;
        book.save(path)
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

fn validate_file_path(path: &Path) -> Result<()> {
    if is_blank(path) {
        return Err(Error::invalid_argument("File path cannot be empty."));
    }
    if !path.is_file() {
        return Err(Error::file_not_found(path));
    }
    Ok(())
}

fn ensure_sheet<W: Workbook>(book: &W, name: &str) -> Result<()> {
    if book.has_sheet(name) {
        Ok(())
    } else {
        Err(Error::SheetNotFound(name.to_string()))
    }
}

/// Fail with `Conflict` if another sheet already uses `name`
///
/// Sheet names collide regardless of case. `renaming` is skipped so a sheet
/// can change the case of its own name.
fn ensure_name_free<W: Workbook>(book: &W, name: &str, renaming: Option<&str>) -> Result<()> {
    let wanted = name.to_lowercase();
    let taken = book
        .sheet_names()
        .iter()
        .filter(|existing| Some(existing.as_str()) != renaming)
        .any(|existing| existing.to_lowercase() == wanted);

    if taken {
        Err(Error::Conflict(name.to_string()))
    } else {
        Ok(())
    }
}

/// Cells outside the sheet's used range read as empty without a lookup
fn read_grid<W: Workbook>(book: &W, sheet: &str, range: &CellRange) -> Result<Vec<Vec<String>>> {
    let used = book.used_range(sheet)?;
    let mut grid = Vec::with_capacity(range.row_count() as usize);
    for row in range.rows() {
        let mut values = Vec::with_capacity(row.len());
        for at in row {
            let value = match used {
                Some(used) if used.contains(at) => book.cell(sheet, at)?.as_text().to_string(),
                _ => String::new(),
            };
            values.push(value);
        }
        grid.push(values);
    }
    Ok(grid)
}

fn to_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::invalid_argument("Input has too many rows or columns."))
}
