use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use crate::marksheet::{Cell, RawRow, RawTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a raw score table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, one student per line
/// * `.json` – `[{ "Name": "...", "Maths": 80, ... }, ...]` (columns in
///   first-seen key order), or `{ "columns": [...], "records": [...] }`
pub fn load_scores(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => load_csv(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<RawTable> {
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut row = RawRow::new();
        for (col_idx, column) in columns.iter().enumerate() {
            if column.is_empty() {
                continue;
            }
            let cell = record.get(col_idx).map(Cell::from_text).unwrap_or(Cell::Empty);
            row.cells.entry(column.clone()).or_insert(cell);
        }
        rows.push(row);
    }

    Ok(RawTable::new(columns, rows))
}

/// Trim, strip a BOM, and collapse internal whitespace.
fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON file {}", path.display()))?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<RawTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let (explicit_columns, records) = match &root {
        JsonValue::Array(records) => (None, records),
        JsonValue::Object(obj) => {
            let records = obj
                .get("records")
                .and_then(JsonValue::as_array)
                .context("Expected a 'records' array")?;
            let columns = obj
                .get("columns")
                .and_then(JsonValue::as_array)
                .map(|cols| {
                    cols.iter()
                        .filter_map(JsonValue::as_str)
                        .map(normalize_header)
                        .collect::<Vec<_>>()
                });
            (columns, records)
        }
        _ => bail!("Expected a top-level JSON array or object"),
    };

    let mut columns: Vec<String> = explicit_columns.clone().unwrap_or_default();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let mut row = RawRow::new();
        for (key, val) in obj {
            let column = normalize_header(key);
            if explicit_columns.is_none() && !columns.contains(&column) {
                columns.push(column.clone());
            }
            row.cells.insert(column, json_to_cell(val));
        }
        rows.push(row);
    }

    Ok(RawTable::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        JsonValue::String(s) => Cell::from_text(s),
        JsonValue::Null => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
