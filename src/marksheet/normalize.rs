use super::config::{CombinedGroup, MarksheetConfig};
use super::table::RawRow;

/// Percentage of a single raw score, or `None` when the score is missing,
/// non-numeric, or the maximum is not positive.
pub fn subject_percentage(raw: Option<f64>, out_of: f64) -> Option<f64> {
    let score = raw?;
    if out_of <= 0.0 {
        return None;
    }
    Some(score / out_of * 100.0)
}

/// Combined-group percentage: summed component scores over summed maxima.
///
/// Missing components add 0 to the numerator but keep their maximum in the
/// denominator. A zero denominator yields `None`.
pub fn combined_percentage(row: &RawRow, group: &CombinedGroup, config: &MarksheetConfig) -> Option<f64> {
    let (scored, possible) = group
        .components
        .iter()
        .fold((0.0, 0.0), |(scored, possible), component| {
            (
                scored + row.number(component).unwrap_or(0.0),
                possible + config.out_of(component),
            )
        });
    if possible <= 0.0 {
        return None;
    }
    Some(scored / possible * 100.0)
}

/// Round to the nearest integer for display and band lookup (half away from zero).
pub fn display_round(pct: f64) -> f64 {
    pct.round()
}
