use super::classify::{classify_columns, normalize_key, ColumnLayout};
use super::config::{CombinedGroup, MarksheetConfig, RankingBasis};
use super::error::MarksheetError;
use super::exclusion::{contributing_subjects, ScoredSubject};
use super::footer::footer_rows;
use super::grading::grade_subject;
use super::model::{Column, Marksheet, MarksheetRow, SubjectCell, MEANS_LABEL, TOTALS_LABEL};
use super::normalize::{combined_percentage, subject_percentage};
use super::present::{column_order, sort_rows};
use super::ranking::{aggregate, competition_ranks, stream_ranks};
use super::table::{RawRow, RawTable};

/// Compute the graded, ranked marksheet for one raw score snapshot.
///
/// Inputs are only borrowed; the result is freshly allocated and identical
/// for identical inputs. The only failure is a table with no usable name
/// column.
pub fn compute_marksheet(table: &RawTable, config: &MarksheetConfig) -> Result<Marksheet, MarksheetError> {
    let layout = classify_columns(table, &config.identity, &config.combined)?;
    let combined = resolve_components(&config.combined, &layout);
    let columns = column_order(&layout, &combined);

    let raw_rows: Vec<&RawRow> = table
        .rows
        .iter()
        .filter(|row| !is_placeholder(row, &layout))
        .collect();

    let mut rows: Vec<MarksheetRow> = raw_rows
        .iter()
        .map(|row| score_row(row, &layout, &columns, &combined, config))
        .collect();

    assign_ranks(&mut rows, config.ranking.basis, layout.class.is_some());

    let rows = sort_rows(rows);
    let footers = footer_rows(&columns, &rows, &config.exclusion);

    log::debug!(
        "Computed marksheet: {} rows ({} skipped), {} columns",
        rows.len(),
        table.rows.len() - rows.len(),
        columns.len()
    );

    Ok(Marksheet {
        columns,
        rows,
        footers,
    })
}

/// Point combined-group components at the table's actual column names.
/// Components with no matching column keep their configured name (and
/// contribute a zero score against their maximum).
fn resolve_components(combined: &[CombinedGroup], layout: &ColumnLayout) -> Vec<CombinedGroup> {
    combined
        .iter()
        .map(|group| {
            let components = group
                .components
                .iter()
                .map(|component| {
                    let key = normalize_key(component);
                    layout
                        .subjects
                        .iter()
                        .find(|s| normalize_key(s) == key)
                        .cloned()
                        .unwrap_or_else(|| component.clone())
                })
                .collect();
            CombinedGroup {
                components,
                ..group.clone()
            }
        })
        .collect()
}

/// Blank rows and footer rows carried over from a previous export.
fn is_placeholder(row: &RawRow, layout: &ColumnLayout) -> bool {
    let name = row.text(&layout.name);
    if name.eq_ignore_ascii_case(TOTALS_LABEL) || name.eq_ignore_ascii_case(MEANS_LABEL) {
        return true;
    }
    name.is_empty()
        && layout
            .subjects
            .iter()
            .all(|s| row.get(s).map_or(true, |cell| cell.is_blank()))
}

fn score_row(
    row: &RawRow,
    layout: &ColumnLayout,
    columns: &[Column],
    combined: &[CombinedGroup],
    config: &MarksheetConfig,
) -> MarksheetRow {
    let grading = &config.grading;

    let scored: Vec<ScoredSubject> = columns
        .iter()
        .filter_map(|column| {
            let (name, percentage) = match column {
                Column::Subject(subject) => (
                    subject.clone(),
                    subject_percentage(row.number(subject), config.out_of(subject)),
                ),
                Column::Combined { name, .. } => {
                    let group = combined.iter().find(|g| &g.name == name)?;
                    (name.clone(), combined_percentage(row, group, config))
                }
                _ => return None,
            };
            let graded = grade_subject(percentage, &name, grading);
            Some(ScoredSubject {
                name,
                percentage,
                grade: graded.grade,
                points: graded.points,
            })
        })
        .collect();

    let contribution = contributing_subjects(&scored, &config.exclusion);
    let totals = aggregate(&scored, &contribution, grading.enabled);

    let name = row.text(&layout.name);
    let dropped = contribution.dropped.map(|i| scored[i].name.clone());
    if let Some(ref subject) = dropped {
        log::trace!("Dropped lowest subject '{}' for '{}'", subject, name);
    }

    let subjects = scored
        .into_iter()
        .map(|s| SubjectCell {
            subject: s.name,
            percentage: s.percentage,
            grade: s.grade,
            points: grading.enabled.then_some(s.points),
        })
        .collect();

    MarksheetRow {
        rank: None,
        stream_rank: None,
        admission_no: layout.admission_no.as_ref().map(|c| row.text(c)),
        name,
        class: layout.class.as_ref().map(|c| row.text(c)),
        subjects,
        total: totals.total,
        mean: totals.mean,
        points: totals.points,
        dropped,
        scaled_total: None,
    }
}

/// Global and stream competition ranks over rows with a name.
fn assign_ranks(rows: &mut [MarksheetRow], basis: RankingBasis, has_class: bool) {
    let ranked: Vec<usize> = (0..rows.len()).filter(|&i| rows[i].is_valid()).collect();
    let metrics: Vec<Option<f64>> = ranked
        .iter()
        .map(|&i| match basis {
            RankingBasis::Total => Some(rows[i].total),
            RankingBasis::Points => rows[i].points,
        })
        .collect();

    let global = competition_ranks(&metrics);
    let streams: Option<Vec<String>> = has_class.then(|| {
        ranked
            .iter()
            .map(|&i| rows[i].class.clone().unwrap_or_default())
            .collect()
    });
    let within = stream_ranks(&metrics, streams.as_deref());

    for (pos, &i) in ranked.iter().enumerate() {
        rows[i].rank = Some(global[pos]);
        rows[i].stream_rank = within[pos];
    }
}
