use serde::{Deserialize, Serialize};

use super::normalize::display_round;
use super::table::format_number;

/// Label held in the Name cell of each footer row.
pub const TOTALS_LABEL: &str = "Totals";
pub const MEANS_LABEL: &str = "Means";

/// A marksheet column, in final display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Rank,
    AdmissionNo,
    Name,
    Class,
    /// Raw subject column.
    Subject(String),
    /// Combined group: `name` is the configured key, `header` is displayed.
    Combined { name: String, header: String },
    Total,
    Mean,
    Points,
    StreamRank,
}

impl Column {
    pub fn header(&self) -> &str {
        match self {
            Column::Rank => "Rank",
            Column::AdmissionNo => "AdmNo",
            Column::Name => "Name",
            Column::Class => "Class",
            Column::Subject(name) => name,
            Column::Combined { header, .. } => header,
            Column::Total => "Total",
            Column::Mean => "Mean",
            Column::Points => "Points",
            Column::StreamRank => "Stream Rank",
        }
    }

    /// Identity columns stay blank in footer rows (Name holds the label).
    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            Column::Rank | Column::AdmissionNo | Column::Name | Column::Class | Column::Points | Column::StreamRank
        )
    }
}

/// One graded subject or combined-group cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectCell {
    /// Subject column or combined-group name.
    pub subject: String,
    /// Full-precision percentage, `None` when there is no value.
    pub percentage: Option<f64>,
    pub grade: Option<String>,
    /// Band points, `None` when grading is disabled.
    pub points: Option<f64>,
}

impl SubjectCell {
    /// Rounded percentage, with the grade appended when there is one.
    pub fn text(&self) -> String {
        let Some(pct) = self.percentage else {
            return String::new();
        };
        let rounded = display_round(pct) as i64;
        match &self.grade {
            Some(grade) => format!("{} {}", rounded, grade),
            None => rounded.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksheetRow {
    pub rank: Option<u32>,
    pub stream_rank: Option<u32>,
    pub admission_no: Option<String>,
    pub name: String,
    pub class: Option<String>,
    /// Displayed subject and combined cells, in column order.
    pub subjects: Vec<SubjectCell>,
    pub total: f64,
    pub mean: f64,
    /// `None` when grading is disabled.
    pub points: Option<f64>,
    /// Subject removed by lowest-subject exclusion.
    #[serde(default)]
    pub dropped: Option<String>,
    /// Display-only total set by [`crate::marksheet::present::rescale_totals`].
    #[serde(default)]
    pub scaled_total: Option<f64>,
}

impl MarksheetRow {
    /// Ranked rows: non-blank name.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn subject(&self, name: &str) -> Option<&SubjectCell> {
        self.subjects.iter().find(|cell| cell.subject == name)
    }

    /// Rendered text of one column.
    pub fn cell(&self, column: &Column) -> String {
        match column {
            Column::Rank => self.rank.map(|r| r.to_string()).unwrap_or_default(),
            Column::AdmissionNo => self.admission_no.clone().unwrap_or_default(),
            Column::Name => self.name.clone(),
            Column::Class => self.class.clone().unwrap_or_default(),
            Column::Subject(name) | Column::Combined { name, .. } => {
                self.subject(name).map(SubjectCell::text).unwrap_or_default()
            }
            Column::Total => {
                let total = self.scaled_total.unwrap_or(self.total);
                (total.round() as i64).to_string()
            }
            Column::Mean => format!("{:.2}", self.mean),
            Column::Points => self.points.map(format_number).unwrap_or_default(),
            Column::StreamRank => self.stream_rank.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

/// A summary row; `cells` align with [`Marksheet::columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterRow {
    pub label: String,
    pub cells: Vec<String>,
}

/// Engine output: column order, sorted body rows, footer rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marksheet {
    pub columns: Vec<Column>,
    pub rows: Vec<MarksheetRow>,
    pub footers: Vec<FooterRow>,
}

impl Marksheet {
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header().to_string()).collect()
    }

    /// Rendered cells of one body row, in column order.
    pub fn row_cells(&self, row: &MarksheetRow) -> Vec<String> {
        self.columns.iter().map(|c| row.cell(c)).collect()
    }

    pub fn body(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| self.row_cells(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(pct: Option<f64>, grade: Option<&str>) -> SubjectCell {
        SubjectCell {
            subject: "Maths".to_string(),
            percentage: pct,
            grade: grade.map(str::to_string),
            points: None,
        }
    }

    fn row() -> MarksheetRow {
        MarksheetRow {
            rank: Some(1),
            stream_rank: None,
            admission_no: Some("1001".to_string()),
            name: "Amy".to_string(),
            class: None,
            subjects: vec![cell(Some(84.6), Some("A"))],
            total: 159.6,
            mean: 79.8,
            points: Some(22.0),
            dropped: None,
            scaled_total: None,
        }
    }

    #[test]
    fn test_subject_cell_text() {
        assert_eq!(cell(Some(84.6), None).text(), "85");
        assert_eq!(cell(Some(84.6), Some("A")).text(), "85 A");
        assert_eq!(cell(None, Some("A")).text(), "");
    }

    #[test]
    fn test_row_cells() {
        let row = row();
        assert_eq!(row.cell(&Column::Rank), "1");
        assert_eq!(row.cell(&Column::StreamRank), "");
        assert_eq!(row.cell(&Column::Subject("Maths".to_string())), "85 A");
        assert_eq!(row.cell(&Column::Subject("English".to_string())), "");
        assert_eq!(row.cell(&Column::Total), "160");
        assert_eq!(row.cell(&Column::Mean), "79.80");
        assert_eq!(row.cell(&Column::Points), "22");
        assert_eq!(row.cell(&Column::Class), "");
    }

    #[test]
    fn test_scaled_total_is_display_only() {
        let mut row = row();
        row.scaled_total = Some(400.0);
        assert_eq!(row.cell(&Column::Total), "400");
        assert_eq!(row.total, 159.6);
    }

    #[test]
    fn test_identity_columns() {
        assert!(Column::Points.is_identity());
        assert!(Column::StreamRank.is_identity());
        assert!(!Column::Total.is_identity());
        assert!(!Column::Subject("Maths".to_string()).is_identity());
    }
}
