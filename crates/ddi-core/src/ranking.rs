use serde::Serialize;

pub const DEFAULT_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedClass {
    pub name: String,
    pub score: f64,
}

impl RankedClass {
    /// Score as a one-decimal percentage, e.g. `82.0%`.
    pub fn percent(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

/// Orders `classes` by descending score and keeps the first `limit`.
///
/// A class without a score ranks with 0. Equal scores keep their input order.
pub fn rank(classes: &[String], scores: &[f64], limit: usize) -> Vec<RankedClass> {
    let mut items: Vec<RankedClass> = classes
        .iter()
        .enumerate()
        .map(|(index, name)| RankedClass {
            name: name.clone(),
            score: scores.get(index).copied().unwrap_or(0.0),
        })
        .collect();
    // sort_by is stable
    items.sort_by(|a, b| b.score.total_cmp(&a.score));
    items.truncate(limit);
    items
}

pub fn rank_top(classes: &[String], scores: &[f64]) -> Vec<RankedClass> {
    rank(classes, scores, DEFAULT_LIMIT)
}
