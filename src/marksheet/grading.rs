use super::config::{GradeBand, GradingConfig};
use super::normalize::display_round;

/// First band, in list order, containing the rounded percentage.
/// Overlapping bands resolve by position, not by specificity.
pub fn resolve_band(pct: Option<f64>, bands: &[GradeBand]) -> Option<&GradeBand> {
    let rounded = display_round(pct?);
    bands.iter().find(|band| band.contains(rounded))
}

pub fn resolve_grade(pct: Option<f64>, bands: &[GradeBand]) -> Option<String> {
    resolve_band(pct, bands).map(|band| band.grade.clone())
}

/// Point value of the matching band, 0 when unmatched or no value.
pub fn resolve_points(pct: Option<f64>, bands: &[GradeBand]) -> f64 {
    resolve_band(pct, bands).map(|band| band.points).unwrap_or(0.0)
}

/// Grade and points for one subject cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectGrade {
    pub grade: Option<String>,
    pub points: f64,
}

/// Grade a subject (or combined group) percentage, using the strict band
/// list when the subject is listed as strict. Disabled grading yields no
/// grade and zero points.
pub fn grade_subject(pct: Option<f64>, subject: &str, grading: &GradingConfig) -> SubjectGrade {
    if !grading.enabled {
        return SubjectGrade {
            grade: None,
            points: 0.0,
        };
    }
    let bands = grading.bands_for(subject);
    match resolve_band(pct, &bands) {
        Some(band) => SubjectGrade {
            grade: Some(band.grade.clone()),
            points: band.points,
        },
        None => SubjectGrade {
            grade: None,
            points: 0.0,
        },
    }
}
