//! Formula evaluation
//!
//! Evaluation is delegated to formualizer. The workbook's literal values and
//! formulas are loaded into a fresh `formualizer::Workbook` and only the
//! requested cell is computed; nothing is written back to the file.
//!
//! # Example
//!
//! ```rust,ignore
//! use xlcli_core::{CellAddress, Workbook, XlsxWorkbook};
//!
//! let mut wb = XlsxWorkbook::new_empty();
//! wb.add_sheet("Sheet1")?;
//! wb.set_value("Sheet1", CellAddress::parse("A1")?, "10")?;
//! wb.set_value("Sheet1", CellAddress::parse("B1")?, "5")?;
//! wb.set_formula("Sheet1", CellAddress::parse("C1")?, "=A1+B1")?;
//! assert_eq!(wb.evaluate("Sheet1", CellAddress::parse("C1")?)?, "15");
//! ```

use formualizer::{LiteralValue, Workbook as Engine};
use log::debug;

use crate::address::CellAddress;
use crate::error::{Error, Result};
use crate::workbook::{CellContent, Workbook};

/// Evaluate one cell of `book`
///
/// Non-formula cells are returned as stored. Every sheet is loaded so
/// cross-sheet references resolve.
pub fn evaluate_cell<W: Workbook>(book: &W, sheet: &str, at: CellAddress) -> Result<String> {
    let content = book.cell(sheet, at)?;
    if !content.is_formula() {
        return Ok(content.as_text().to_string());
    }

    let mut engine = Engine::new();
    let mut loaded = 0usize;

    for name in book.sheet_names() {
        if !engine.has_sheet(&name) {
            engine.add_sheet(&name);
        }
        let Some(range) = book.used_range(&name)? else {
            continue;
        };
        for addr in range.cells() {
            match book.cell(&name, addr)? {
                CellContent::Empty => {}
                CellContent::Formula(formula) => {
                    engine
                        .set_formula(&name, addr.row, addr.col, &formula)
                        .map_err(evaluation_error)?;
                    loaded += 1;
                }
                literal => {
                    engine
                        .set_value(&name, addr.row, addr.col, to_literal(&literal))
                        .map_err(evaluation_error)?;
                    loaded += 1;
                }
            }
        }
    }

    debug!("Loaded {} cells for evaluation of {}!{}", loaded, sheet, at);

    let value = engine
        .evaluate_cell(sheet, at.row, at.col)
        .map_err(evaluation_error)?;
    Ok(render_value(&value))
}

fn evaluation_error(err: impl std::fmt::Display) -> Error {
    Error::Evaluation(err.to_string())
}

/// The engine value for a stored literal, keeping the cell's type
fn to_literal(content: &CellContent) -> LiteralValue {
    match content {
        CellContent::Empty => LiteralValue::Empty,
        CellContent::Number(text) => match text.parse::<f64>() {
            Ok(n) => LiteralValue::Number(n),
            Err(_) => LiteralValue::Text(text.clone()),
        },
        CellContent::Bool(b) => LiteralValue::Boolean(*b),
        CellContent::Text(text) | CellContent::Formula(text) => LiteralValue::Text(text.clone()),
    }
}

/// Render a calculated value as text
///
/// Whole numbers print without a fractional part (`60`, not `60.0`).
pub(crate) fn render_value(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Empty => String::new(),
        LiteralValue::Number(n) => format_number(*n),
        LiteralValue::Int(i) => i.to_string(),
        LiteralValue::Text(s) => s.to_string(),
        LiteralValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        LiteralValue::Error(e) => e.to_string(),
        other => format!("{:?}", other),
    }
}

/// Format a number the way the CLI prints it
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
