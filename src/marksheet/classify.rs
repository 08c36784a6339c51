use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::config::CombinedGroup;
use super::error::MarksheetError;
use super::table::RawTable;

/// Comparison key for column and subject names: lowercase, with whitespace
/// and the punctuation `. _ - / ( )` removed.
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | '_' | '-' | '/' | '(' | ')'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Column names recognized as identity/admin columns rather than subjects.
///
/// Entries are compared with [`normalize_key`], so "Adm No." and "ADMNO"
/// are the same variant.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityPolicy {
    pub admission_no: Vec<String>,
    pub name: Vec<String>,
    pub class: Vec<String>,
    /// Recognized but not carried into the marksheet (term, year, old ranks...).
    pub other: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for IdentityPolicy {
    fn default() -> Self {
        Self {
            admission_no: strings(&[
                "adm",
                "admno",
                "admissionno",
                "admissionnumber",
                "admission",
                "regno",
            ]),
            name: strings(&["name", "names", "studentname", "fullname"]),
            class: strings(&["class", "stream", "form", "classstream", "section"]),
            other: strings(&[
                "term",
                "year",
                "rank",
                "position",
                "pos",
                "total",
                "totals",
                "mean",
                "points",
                "streamrank",
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRole {
    AdmissionNo,
    Name,
    Class,
    Other,
}

impl IdentityPolicy {
    pub fn role(&self, column: &str) -> Option<IdentityRole> {
        let key = normalize_key(column);
        let hit = |variants: &[String]| variants.iter().any(|v| normalize_key(v) == key);
        if hit(&self.admission_no) {
            Some(IdentityRole::AdmissionNo)
        } else if hit(&self.name) {
            Some(IdentityRole::Name)
        } else if hit(&self.class) {
            Some(IdentityRole::Class)
        } else if hit(&self.other) {
            Some(IdentityRole::Other)
        } else {
            None
        }
    }
}

/// Result of classifying the raw table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub admission_no: Option<String>,
    pub name: String,
    pub class: Option<String>,
    /// Raw subject columns in detection order, de-duplicated.
    pub subjects: Vec<String>,
}

/// Split columns into identity columns and subject columns.
///
/// Combined-group name columns are dropped (they are derived, not input).
/// When no name column is recognized, the first subject column holding text
/// but no numbers stands in for it.
pub fn classify_columns(
    table: &RawTable,
    policy: &IdentityPolicy,
    combined: &[CombinedGroup],
) -> Result<ColumnLayout, MarksheetError> {
    let derived: HashSet<String> = combined
        .iter()
        .flat_map(|g| [normalize_key(&g.name), normalize_key(g.display_header())])
        .collect();

    let mut admission_no = None;
    let mut name = None;
    let mut class = None;
    let mut subjects = Vec::new();
    let mut seen = HashSet::new();

    for column in &table.columns {
        match policy.role(column) {
            Some(IdentityRole::AdmissionNo) => {
                admission_no.get_or_insert_with(|| column.clone());
            }
            Some(IdentityRole::Name) => {
                name.get_or_insert_with(|| column.clone());
            }
            Some(IdentityRole::Class) => {
                class.get_or_insert_with(|| column.clone());
            }
            Some(IdentityRole::Other) => {}
            None => {
                let key = normalize_key(column);
                if key.is_empty() || derived.contains(&key) {
                    continue;
                }
                if seen.insert(key) {
                    subjects.push(column.clone());
                }
            }
        }
    }

    let name = match name {
        Some(n) => n,
        None => {
            let fallback = subjects
                .iter()
                .position(|col| is_text_column(table, col))
                .ok_or_else(|| MarksheetError::MissingNameColumn {
                    columns: table.columns.clone(),
                })?;
            let col = subjects.remove(fallback);
            log::warn!("No name column recognized; using '{}' as the name column", col);
            col
        }
    };

    log::debug!(
        "Classified columns: name='{}', admission_no={:?}, class={:?}, {} subjects",
        name,
        admission_no,
        class,
        subjects.len()
    );

    Ok(ColumnLayout {
        admission_no,
        name,
        class,
        subjects,
    })
}

/// A column with at least one non-blank cell and no numeric cells.
fn is_text_column(table: &RawTable, column: &str) -> bool {
    let mut any = false;
    for row in &table.rows {
        if let Some(cell) = row.get(column) {
            if cell.is_blank() {
                continue;
            }
            if cell.as_number().is_some() {
                return false;
            }
            any = true;
        }
    }
    any
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marksheet::table::{Cell, RawRow};

    fn table(columns: &[&str], rows: Vec<RawRow>) -> RawTable {
        RawTable::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(" Adm No. "), "admno");
        assert_eq!(normalize_key("STREAM_RANK"), "streamrank");
        assert_eq!(normalize_key("Chem-istry"), "chemistry");
        assert_eq!(normalize_key("Class/Stream"), "classstream");
        assert_eq!(normalize_key("Adm (No)"), "admno");
    }

    #[test]
    fn test_identity_roles() {
        let policy = IdentityPolicy::default();
        assert_eq!(policy.role("ADM NO"), Some(IdentityRole::AdmissionNo));
        assert_eq!(policy.role("Student Name"), Some(IdentityRole::Name));
        assert_eq!(policy.role("Stream"), Some(IdentityRole::Class));
        assert_eq!(policy.role("Term"), Some(IdentityRole::Other));
        assert_eq!(policy.role("Mean"), Some(IdentityRole::Other));
        assert_eq!(policy.role("Maths"), None);
    }

    #[test]
    fn test_subjects_in_detection_order() {
        let t = table(&["Adm No", "Name", "Class", "Maths", "English", "Total"], vec![]);
        let layout = classify_columns(&t, &IdentityPolicy::default(), &[]).unwrap();
        assert_eq!(layout.admission_no.as_deref(), Some("Adm No"));
        assert_eq!(layout.name, "Name");
        assert_eq!(layout.class.as_deref(), Some("Class"));
        assert_eq!(layout.subjects, vec!["Maths", "English"]);
    }

    #[test]
    fn test_slashed_class_header() {
        let t = table(&["Name", "Class/Stream", "Maths"], vec![]);
        let layout = classify_columns(&t, &IdentityPolicy::default(), &[]).unwrap();
        assert_eq!(layout.class.as_deref(), Some("Class/Stream"));
        assert_eq!(layout.subjects, vec!["Maths"]);
    }

    #[test]
    fn test_duplicate_subjects_first_wins() {
        let t = table(&["Name", "Maths", "MATHS ", "English"], vec![]);
        let layout = classify_columns(&t, &IdentityPolicy::default(), &[]).unwrap();
        assert_eq!(layout.subjects, vec!["Maths", "English"]);
    }

    #[test]
    fn test_combined_group_columns_removed() {
        let group = CombinedGroup {
            name: "Sciences".to_string(),
            components: vec!["Bio".to_string(), "Chem".to_string()],
            header: Some("SCI".to_string()),
            hide_components: true,
        };
        let t = table(&["Name", "Bio", "Chem", "sciences", "SCI"], vec![]);
        let layout = classify_columns(&t, &IdentityPolicy::default(), &[group]).unwrap();
        assert_eq!(layout.subjects, vec!["Bio", "Chem"]);
    }

    #[test]
    fn test_fallback_name_column() {
        let rows = vec![
            RawRow::new()
                .with("Learner", Cell::Text("Amy".to_string()))
                .with("Maths", Cell::Number(70.0)),
            RawRow::new()
                .with("Learner", Cell::Empty)
                .with("Maths", Cell::Number(60.0)),
        ];
        let t = table(&["Maths", "Learner"], rows);
        let layout = classify_columns(&t, &IdentityPolicy::default(), &[]).unwrap();
        assert_eq!(layout.name, "Learner");
        assert_eq!(layout.subjects, vec!["Maths"]);
    }

    #[test]
    fn test_missing_name_column_fails() {
        let rows = vec![RawRow::new().with("Maths", Cell::Number(70.0))];
        let t = table(&["Maths"], rows);
        let err = classify_columns(&t, &IdentityPolicy::default(), &[]).unwrap_err();
        assert!(matches!(err, MarksheetError::MissingNameColumn { .. }));
    }
}
