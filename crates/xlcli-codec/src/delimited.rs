//! Delimited text (CSV) encoding of row grids

use std::io::{Read, Write};

use crate::error::CodecResult;
use crate::options::{CsvReadOptions, CsvWriteOptions, LineTerminator};

/// Write rows as CSV
///
/// A field is quoted only when it contains the delimiter, a quote or a line
/// break; embedded quotes are doubled. A row with no text at all is written
/// as an empty line.
pub fn write_csv<W: Write>(
    writer: W,
    rows: &[Vec<String>],
    options: &CsvWriteOptions,
) -> CodecResult<()> {
    let (terminator, line_end): (csv::Terminator, &[u8]) = match options.line_terminator {
        LineTerminator::LF => (csv::Terminator::Any(b'\n'), b"\n"),
        LineTerminator::CRLF => (csv::Terminator::CRLF, b"\r\n"),
    };

    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(options.delimiter)
        .quote(options.quote)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(terminator)
        .flexible(true);
    let mut csv_writer = builder.from_writer(writer);

    for row in rows {
        // The csv writer renders a lone empty field as `""`
        if row.len() <= 1 && row.iter().all(String::is_empty) {
            let mut inner = csv_writer.into_inner().map_err(|e| e.into_error())?;
            inner.write_all(line_end)?;
            csv_writer = builder.from_writer(inner);
            continue;
        }
        csv_writer.write_record(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Read CSV into rows of fields
///
/// Every line is data; there is no header handling. Rows may differ in
/// length, and a blank line becomes an empty row so later rows keep their
/// line position. A quoted field may span lines.
pub fn read_csv<R: Read>(
    mut reader: R,
    options: &CsvReadOptions,
) -> CodecResult<Vec<Vec<String>>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(false)
        .flexible(true)
        .trim(if options.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        });

    let mut rows = Vec::new();
    for line in logical_lines(&text, char::from(options.quote)) {
        if line.is_empty() {
            rows.push(Vec::new());
            continue;
        }
        let mut record = csv::StringRecord::new();
        builder.from_reader(line.as_bytes()).read_record(&mut record)?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Split `text` into records: physical lines, except that a line break
/// inside an open quote joins the next line. Terminators are stripped.
fn logical_lines(text: &str, quote: char) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut open = false;

    for (i, c) in text.char_indices() {
        if c == quote {
            open = !open;
        } else if c == '\n' && !open {
            lines.push(strip_cr(&text[start..i]));
            start = i + 1;
        }
    }
    if start < text.len() {
        lines.push(strip_cr(&text[start..]));
    }
    lines
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn to_string(rows: &[Vec<String>], options: &CsvWriteOptions) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, rows, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_plain_rows() {
        let rows = grid(&[&["Name", "Age"], &["Alice", "30"]]);
        assert_eq!(
            to_string(&rows, &CsvWriteOptions::default()),
            "Name,Age\nAlice,30\n"
        );
    }

    #[test]
    fn test_write_quotes_only_when_needed() {
        let rows = grid(&[&["Hello, World", "say \"hi\"", "two\nlines", "plain"]]);
        assert_eq!(
            to_string(&rows, &CsvWriteOptions::default()),
            "\"Hello, World\",\"say \"\"hi\"\"\",\"two\nlines\",plain\n"
        );
    }

    #[test]
    fn test_write_crlf() {
        let options = CsvWriteOptions {
            line_terminator: LineTerminator::CRLF,
            ..Default::default()
        };
        let rows = grid(&[&["a", "b"], &["c", "d"]]);
        assert_eq!(to_string(&rows, &options), "a,b\r\nc,d\r\n");
    }

    #[test]
    fn test_read_quoted_fields() {
        let input = "Name,Greeting\nAlice,\"Hello, World\"\nBob,\"say \"\"hi\"\"\"\n";
        let rows = read_csv(input.as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(
            rows,
            grid(&[
                &["Name", "Greeting"],
                &["Alice", "Hello, World"],
                &["Bob", "say \"hi\""],
            ])
        );
    }

    #[test]
    fn test_read_ragged_rows() {
        let input = "a,b,c\nd\ne,f\n";
        let rows = read_csv(input.as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(rows, grid(&[&["a", "b", "c"], &["d"], &["e", "f"]]));
    }

    #[test]
    fn test_read_quoted_newline() {
        let input = "\"two\nlines\",x\n";
        let rows = read_csv(input.as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(rows, grid(&[&["two\nlines", "x"]]));
    }

    #[test]
    fn test_write_blank_single_column_row() {
        let rows = grid(&[&["x"], &[""], &["y"], &[]]);
        assert_eq!(to_string(&rows, &CsvWriteOptions::default()), "x\n\ny\n\n");

        let options = CsvWriteOptions {
            line_terminator: LineTerminator::CRLF,
            ..Default::default()
        };
        assert_eq!(to_string(&rows[..3], &options), "x\r\n\r\ny\r\n");
    }

    #[test]
    fn test_write_blank_multi_column_row() {
        let rows = grid(&[&["a", "b"], &["", ""]]);
        assert_eq!(to_string(&rows, &CsvWriteOptions::default()), "a,b\n,\n");
    }

    #[test]
    fn test_read_keeps_blank_lines() {
        let rows = read_csv("a\n\nb\n".as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(rows, vec![vec!["a".to_string()], vec![], vec!["b".to_string()]]);

        let rows = read_csv("a,1\r\n\r\n\r\nb,2".as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3], vec!["b", "2"]);
    }

    #[test]
    fn test_read_blank_line_inside_quotes() {
        let input = "\"one\n\ntwo\",x\nnext\n";
        let rows = read_csv(input.as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(rows, grid(&[&["one\n\ntwo", "x"], &["next"]]));
    }

    #[test]
    fn test_written_blank_rows_read_back_in_place() {
        let rows = grid(&[&["x"], &[""], &["y"]]);
        let text = to_string(&rows, &CsvWriteOptions::default());
        let back = read_csv(text.as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back[2], vec!["y"]);
    }

    #[test]
    fn test_read_with_semicolons_and_trim() {
        let options = CsvReadOptions {
            delimiter: b';',
            trim: true,
            ..Default::default()
        };
        let rows = read_csv(" a ; b \n".as_bytes(), &options).unwrap();
        assert_eq!(rows, grid(&[&["a", "b"]]));
    }
}
