use super::config::ExclusionConfig;
use super::model::{Column, FooterRow, MarksheetRow, MEANS_LABEL, TOTALS_LABEL};

/// First numeric token in a cell ("85 A" -> 85, "79.80" -> 79.8).
pub fn first_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    while i < len {
        let negative = bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if bytes[i].is_ascii_digit() || negative {
            let start = i;
            i += 1;
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i + 1 < len && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
                i += 1;
                while i < len && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            return text[start..i].parse().ok();
        }
        i += 1;
    }
    None
}

/// Totals and Means rows over valid students not excluded from the footer.
///
/// Values are read back from the rendered cells so graded cells ("85 A")
/// aggregate by their percentage. A column with no numeric values stays blank.
pub fn footer_rows(columns: &[Column], rows: &[MarksheetRow], exclusion: &ExclusionConfig) -> Vec<FooterRow> {
    let included: Vec<&MarksheetRow> = rows
        .iter()
        .filter(|row| row.is_valid() && !exclusion.excludes_from_footer(&row.name))
        .collect();

    let mut totals = Vec::with_capacity(columns.len());
    let mut means = Vec::with_capacity(columns.len());

    for column in columns {
        if *column == Column::Name {
            totals.push(TOTALS_LABEL.to_string());
            means.push(MEANS_LABEL.to_string());
            continue;
        }
        if column.is_identity() {
            totals.push(String::new());
            means.push(String::new());
            continue;
        }

        let values: Vec<f64> = included
            .iter()
            .filter_map(|row| first_number(&row.cell(column)))
            .collect();
        if values.is_empty() {
            totals.push(String::new());
            means.push(String::new());
            continue;
        }
        let sum: f64 = values.iter().sum();
        totals.push((sum.round() as i64).to_string());
        means.push(format!("{:.2}", sum / values.len() as f64));
    }

    log::debug!(
        "Footer computed over {} of {} rows",
        included.len(),
        rows.len()
    );

    vec![
        FooterRow {
            label: TOTALS_LABEL.to_string(),
            cells: totals,
        },
        FooterRow {
            label: MEANS_LABEL.to_string(),
            cells: means,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marksheet::model::SubjectCell;

    fn row(name: &str, maths: Option<f64>, total: f64) -> MarksheetRow {
        MarksheetRow {
            rank: None,
            stream_rank: None,
            admission_no: None,
            name: name.to_string(),
            class: None,
            subjects: vec![SubjectCell {
                subject: "Maths".to_string(),
                percentage: maths,
                grade: Some("A".to_string()),
                points: Some(12.0),
            }],
            total,
            mean: total,
            points: Some(12.0),
            dropped: None,
            scaled_total: None,
        }
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::Rank,
            Column::Name,
            Column::Subject("Maths".to_string()),
            Column::Total,
            Column::Points,
        ]
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("85 A"), Some(85.0));
        assert_eq!(first_number("79.80"), Some(79.8));
        assert_eq!(first_number("B+ 64"), Some(64.0));
        assert_eq!(first_number("-3"), Some(-3.0));
        assert_eq!(first_number("12."), Some(12.0));
        assert_eq!(first_number("A"), None);
        assert_eq!(first_number(""), None);
    }

    #[test]
    fn test_footer_totals_and_means() {
        let rows = vec![row("Amy", Some(80.0), 80.0), row("Ben", Some(65.0), 65.0)];
        let footers = footer_rows(&columns(), &rows, &ExclusionConfig::default());
        assert_eq!(footers[0].cells, vec!["", "Totals", "145", "145", ""]);
        assert_eq!(footers[1].cells, vec!["", "Means", "72.50", "72.50", ""]);
    }

    #[test]
    fn test_footer_skips_blank_values_and_rows() {
        let rows = vec![
            row("Amy", Some(80.0), 80.0),
            row("Ben", None, 0.0),
            row("", Some(10.0), 10.0),
        ];
        let footers = footer_rows(&columns(), &rows, &ExclusionConfig::default());
        // Ben has no Maths value; the unnamed row is not counted at all
        assert_eq!(footers[1].cells[2], "80.00");
        assert_eq!(footers[1].cells[3], "40.00");
    }

    #[test]
    fn test_footer_exclusion() {
        let rows = vec![row("Amy", Some(80.0), 80.0), row("John", Some(20.0), 20.0)];
        let exclusion = ExclusionConfig {
            footer_students: vec!["John".to_string()],
            ..Default::default()
        };
        let footers = footer_rows(&columns(), &rows, &exclusion);
        assert_eq!(footers[0].cells[2], "80");
        assert_eq!(footers[1].cells[2], "80.00");
    }

    #[test]
    fn test_footer_empty_column_blank() {
        let rows = vec![row("Amy", None, 0.0)];
        let footers = footer_rows(&columns(), &rows, &ExclusionConfig::default());
        assert_eq!(footers[0].cells[2], "");
        assert_eq!(footers[1].cells[2], "");
    }
}
