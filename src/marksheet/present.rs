use super::classify::{normalize_key, ColumnLayout};
use super::config::{CombinedGroup, ExclusionConfig};
use super::footer::footer_rows;
use super::model::{Column, Marksheet, MarksheetRow};

/// Whether `subject` is a hidden component of any combined group.
pub fn is_hidden_component(subject: &str, combined: &[CombinedGroup]) -> bool {
    let key = normalize_key(subject);
    combined
        .iter()
        .filter(|g| g.hide_components)
        .any(|g| g.components.iter().any(|c| normalize_key(c) == key))
}

/// Final column order.
///
/// Rank, AdmNo, Name, Class, then subjects in detection order with each
/// combined group placed right after the rightmost of its components
/// (groups without surviving components go last), then Total, Mean,
/// Points, Stream Rank.
pub fn column_order(layout: &ColumnLayout, combined: &[CombinedGroup]) -> Vec<Column> {
    let mut columns = vec![Column::Rank];
    if layout.admission_no.is_some() {
        columns.push(Column::AdmissionNo);
    }
    columns.push(Column::Name);
    if layout.class.is_some() {
        columns.push(Column::Class);
    }

    let anchor = |group: &CombinedGroup| -> Option<usize> {
        let keys: Vec<String> = group.components.iter().map(|c| normalize_key(c)).collect();
        layout
            .subjects
            .iter()
            .rposition(|s| keys.contains(&normalize_key(s)))
    };
    let anchors: Vec<Option<usize>> = combined.iter().map(anchor).collect();

    for (idx, subject) in layout.subjects.iter().enumerate() {
        if !is_hidden_component(subject, combined) {
            columns.push(Column::Subject(subject.clone()));
        }
        for (group, at) in combined.iter().zip(&anchors) {
            if *at == Some(idx) {
                columns.push(combined_column(group));
            }
        }
    }
    for (group, at) in combined.iter().zip(&anchors) {
        if at.is_none() {
            columns.push(combined_column(group));
        }
    }

    columns.extend([Column::Total, Column::Mean, Column::Points, Column::StreamRank]);
    columns
}

fn combined_column(group: &CombinedGroup) -> Column {
    Column::Combined {
        name: group.name.clone(),
        header: group.display_header().to_string(),
    }
}

/// Display order: rank (unranked last), then class, then name.
pub fn sort_rows(mut rows: Vec<MarksheetRow>) -> Vec<MarksheetRow> {
    rows.sort_by(|a, b| {
        let rank_a = a.rank.unwrap_or(u32::MAX);
        let rank_b = b.rank.unwrap_or(u32::MAX);
        rank_a
            .cmp(&rank_b)
            .then_with(|| {
                let class_a = a.class.as_deref().unwrap_or("");
                let class_b = b.class.as_deref().unwrap_or("");
                class_a.cmp(class_b)
            })
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

/// Rescale the displayed Total column to a new maximum.
///
/// `displayed = total / observed_max * target_max`, where `observed_max` is
/// the largest total in the body, unranked rows included. Stored totals,
/// means and ranks are left alone; footers are recomputed from the rescaled
/// view. A non-positive observed max or target returns an unchanged copy.
pub fn rescale_totals(marksheet: &Marksheet, target_max: f64, exclusion: &ExclusionConfig) -> Marksheet {
    let observed_max = marksheet
        .rows
        .iter()
        .map(|row| row.total)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut rescaled = marksheet.clone();
    if !(observed_max > 0.0 && target_max > 0.0) {
        log::debug!("Skipping total rescale (observed max {}, target {})", observed_max, target_max);
        return rescaled;
    }

    for row in &mut rescaled.rows {
        row.scaled_total = Some(row.total / observed_max * target_max);
    }
    rescaled.footers = footer_rows(&rescaled.columns, &rescaled.rows, exclusion);
    rescaled
}
