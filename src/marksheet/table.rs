use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single raw cell as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Guess the cell type from raw text (empty -> Empty, numeric -> Number).
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    /// Numeric coercion: finite numbers and numeric text, otherwise "no value".
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Text form used for identity passthrough. Integral numbers drop the ".0".
    pub fn as_text(&self) -> String {
        match self {
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Empty => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => !n.is_finite(),
        }
    }
}

/// One student's raw input: column name -> cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub cells: BTreeMap<String, Cell>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and loaders.
    pub fn with(mut self, column: &str, cell: Cell) -> Self {
        self.cells.insert(column.to_string(), cell);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn text(&self, column: &str) -> String {
        self.get(column).map(Cell::as_text).unwrap_or_default()
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Cell::as_number)
    }
}

/// The raw snapshot handed to the engine: ordered headers plus rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Format a number without trailing zeros ("40" not "40.0", "1.5" not "1.50").
pub fn format_number(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_guesses_type() {
        assert_eq!(Cell::from_text(""), Cell::Empty);
        assert_eq!(Cell::from_text("   "), Cell::Empty);
        assert_eq!(Cell::from_text(" 42 "), Cell::Number(42.0));
        assert_eq!(Cell::from_text("absent"), Cell::Text("absent".to_string()));
    }

    #[test]
    fn test_as_number_coerces_text() {
        assert_eq!(Cell::Text(" 12.5".to_string()).as_number(), Some(12.5));
        assert_eq!(Cell::Text("x".to_string()).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_as_text_integral_number() {
        assert_eq!(Cell::Number(1234.0).as_text(), "1234");
        assert_eq!(Cell::Number(2.5).as_text(), "2.5");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(40.0), "40");
        assert_eq!(format_number(1.50), "1.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(100.0), "100");
    }

    #[test]
    fn test_cell_json_untagged() {
        let row: RawRow =
            serde_json::from_str(r#"{"cells":{"Name":"Amy","Math":80,"Eng":null}}"#).unwrap();
        assert_eq!(row.text("Name"), "Amy");
        assert_eq!(row.number("Math"), Some(80.0));
        assert_eq!(row.get("Eng"), Some(&Cell::Empty));
    }
}
