//! JSON encoding of row grids
//!
//! A grid maps to an array of objects: the first row supplies the keys and
//! every following row becomes one object.

use std::io::{Read, Write};

use serde_json::{Map, Value};

use crate::error::{CodecError, CodecResult};
use crate::options::JsonWriteOptions;

/// Write rows as a JSON array of objects keyed by the first row
///
/// Cells beyond the header width are dropped. A repeated header keeps the
/// last value written under it.
pub fn write_json<W: Write>(
    mut writer: W,
    rows: &[Vec<String>],
    options: &JsonWriteOptions,
) -> CodecResult<()> {
    let mut objects = Vec::new();

    if let Some((headers, records)) = rows.split_first() {
        for record in records {
            let object: Map<String, Value> = headers
                .iter()
                .zip(record)
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            objects.push(Value::Object(object));
        }
    }

    let array = Value::Array(objects);
    if options.pretty {
        serde_json::to_writer_pretty(&mut writer, &array)?;
    } else {
        serde_json::to_writer(&mut writer, &array)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a JSON array of objects into a header row plus data rows
///
/// The header is the key set of the first object, in document order. Each
/// object yields one row aligned to the header; `None` marks a key the
/// object does not have. An empty array yields no rows.
pub fn read_json<R: Read>(reader: R) -> CodecResult<Vec<Vec<Option<String>>>> {
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(items) = value else {
        return Err(CodecError::Shape("expected an array of objects".into()));
    };

    let mut objects = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => objects.push(map),
            other => {
                return Err(CodecError::Shape(format!(
                    "element {} is {}, expected an object",
                    index,
                    kind(&other)
                )))
            }
        }
    }

    let Some(first) = objects.first() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut rows = Vec::with_capacity(objects.len() + 1);
    rows.push(headers.iter().cloned().map(Some).collect());
    for object in &objects {
        rows.push(
            headers
                .iter()
                .map(|key| object.get(key).map(scalar_text))
                .collect(),
        );
    }
    Ok(rows)
}

/// Render a JSON value the way it should land in a cell
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
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

    fn some(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn test_write_objects_keyed_by_header() {
        let rows = grid(&[&["Name", "Age"], &["Alice", "30"], &["Bob", "25"]]);
        let mut out = Vec::new();
        write_json(&mut out, &rows, &JsonWriteOptions { pretty: false }).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"[{"Name":"Alice","Age":"30"},{"Name":"Bob","Age":"25"}]"#
        );
    }

    #[test]
    fn test_write_header_only_is_empty_array() {
        let rows = grid(&[&["Name", "Age"]]);
        let mut out = Vec::new();
        write_json(&mut out, &rows, &JsonWriteOptions { pretty: false }).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]");
    }

    #[test]
    fn test_write_pretty() {
        let rows = grid(&[&["k"], &["v"]]);
        let mut out = Vec::new();
        write_json(&mut out, &rows, &JsonWriteOptions::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[\n  {\n    \"k\": \"v\"\n  }\n]"
        );
    }

    #[test]
    fn test_read_objects() {
        let input = r#"[{"Name":"Alice","Age":30,"Active":true},{"Name":"Bob","Age":null}]"#;
        let rows = read_json(input.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                some(&["Name", "Age", "Active"]),
                some(&["Alice", "30", "true"]),
                vec![Some("Bob".into()), Some(String::new()), None],
            ]
        );
    }

    #[test]
    fn test_read_ignores_keys_outside_header() {
        let input = r#"[{"a":"1"},{"a":"2","b":"3"}]"#;
        let rows = read_json(input.as_bytes()).unwrap();
        assert_eq!(rows, vec![some(&["a"]), some(&["1"]), some(&["2"])]);
    }

    #[test]
    fn test_read_empty_array() {
        assert!(read_json("[]".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_read_rejects_other_layouts() {
        assert!(matches!(
            read_json(r#"{"a":1}"#.as_bytes()),
            Err(CodecError::Shape(_))
        ));
        assert!(matches!(
            read_json(r#"[{"a":1}, 2]"#.as_bytes()),
            Err(CodecError::Shape(msg)) if msg.contains("element 1")
        ));
        assert!(matches!(read_json("not json".as_bytes()), Err(CodecError::Json(_))));
    }
}
