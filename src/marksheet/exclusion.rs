use super::config::ExclusionConfig;

/// One subject (or combined group) as scored for a single student.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSubject {
    /// Subject column or combined-group name.
    pub name: String,
    pub percentage: Option<f64>,
    /// Band grade, `None` when ungraded or unmatched.
    pub grade: Option<String>,
    pub points: f64,
}

/// Subjects counted towards one student's Total, Mean and Points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contribution {
    /// Indices into the student's scored subjects, in subject order.
    pub indices: Vec<usize>,
    /// Index removed by lowest-subject exclusion, if any.
    pub dropped: Option<usize>,
}

/// Build the contributing set for one student.
///
/// Static exclusions apply to everyone. With `drop_lowest`, the single
/// smallest percentage is removed afterwards (missing counts as 0, ties go
/// to the first in subject order). Nothing is dropped from a set of one.
pub fn contributing_subjects(subjects: &[ScoredSubject], exclusion: &ExclusionConfig) -> Contribution {
    let mut indices: Vec<usize> = subjects
        .iter()
        .enumerate()
        .filter(|(_, s)| !exclusion.excludes_subject(&s.name))
        .map(|(i, _)| i)
        .collect();

    let mut dropped = None;
    if exclusion.drop_lowest && indices.len() > 1 {
        let mut lowest = 0;
        for pos in 1..indices.len() {
            if value(&subjects[indices[pos]]) < value(&subjects[indices[lowest]]) {
                lowest = pos;
            }
        }
        dropped = Some(indices.remove(lowest));
    }

    Contribution { indices, dropped }
}

fn value(subject: &ScoredSubject) -> f64 {
    subject.percentage.unwrap_or(0.0)
}
