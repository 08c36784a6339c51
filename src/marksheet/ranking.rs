use std::collections::BTreeMap;

use super::exclusion::{Contribution, ScoredSubject};

/// Per-student aggregates over the contributing subjects.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub total: f64,
    pub mean: f64,
    /// `None` when grading is disabled.
    pub points: Option<f64>,
}

/// Total, Mean and Points over the same contributing subset.
pub fn aggregate(subjects: &[ScoredSubject], contribution: &Contribution, grading_enabled: bool) -> Aggregate {
    let counted: Vec<&ScoredSubject> = contribution.indices.iter().map(|&i| &subjects[i]).collect();
    let total: f64 = counted.iter().map(|s| s.percentage.unwrap_or(0.0)).sum();
    let mean = total / counted.len().max(1) as f64;
    let points = grading_enabled.then(|| counted.iter().map(|s| s.points).sum::<f64>());
    Aggregate { total, mean, points }
}

/// Metrics equal to two decimal places tie. Missing metrics sort lowest.
fn rank_key(metric: Option<f64>) -> Option<i64> {
    metric
        .filter(|m| m.is_finite())
        .map(|m| (m * 100.0).round() as i64)
}

/// Competition ranking ("1224"): ties share a rank and the next distinct
/// value skips the tied count. `[180, 180, 150]` ranks `[1, 1, 3]`.
pub fn competition_ranks(metrics: &[Option<f64>]) -> Vec<u32> {
    let keys: Vec<Option<i64>> = metrics.iter().map(|m| rank_key(*m)).collect();
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[b].cmp(&keys[a]));

    let mut ranks = vec![0; keys.len()];
    let mut current = 0;
    for (pos, &idx) in order.iter().enumerate() {
        if pos == 0 || keys[idx] != keys[order[pos - 1]] {
            current = pos as u32 + 1;
        }
        ranks[idx] = current;
    }
    ranks
}

/// Competition ranking within each stream.
///
/// `streams` is `None` when the table has no class column; stream rank then
/// mirrors the global rank. Students with a blank class get no stream rank.
pub fn stream_ranks(metrics: &[Option<f64>], streams: Option<&[String]>) -> Vec<Option<u32>> {
    let Some(streams) = streams else {
        return competition_ranks(metrics).into_iter().map(Some).collect();
    };

    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, stream) in streams.iter().enumerate() {
        let key = stream.trim().to_lowercase();
        if !key.is_empty() {
            groups.entry(key).or_default().push(idx);
        }
    }

    let mut ranks = vec![None; metrics.len()];
    for members in groups.values() {
        let group_metrics: Vec<Option<f64>> = members.iter().map(|&i| metrics[i]).collect();
        for (&idx, rank) in members.iter().zip(competition_ranks(&group_metrics)) {
            ranks[idx] = Some(rank);
        }
    }
    ranks
}
