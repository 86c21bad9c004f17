//! Ranking search results within a scan and filtering them on their significance score

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::psm::SearchResult;

/// The direction in which a significance score improves
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ScoreOrientation {
    /// P-values, E-values, Q-values
    LowerIsBetter,
    /// Probabilities, scores
    HigherIsBetter,
}

impl ScoreOrientation {
    /// Order two scores, the better score is ordered first
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::LowerIsBetter => a.total_cmp(&b),
            Self::HigherIsBetter => b.total_cmp(&a),
        }
    }

    /// If the score is at least as good as the threshold
    pub fn passes(self, score: f64, threshold: f64) -> bool {
        match self {
            Self::LowerIsBetter => score <= threshold,
            Self::HigherIsBetter => score >= threshold,
        }
    }
}

/// The fields needed to rank a result and estimate its false discovery rate
pub trait ScoredResult {
    /// The scan number
    fn scan(&self) -> u32;
    /// The precursor charge
    fn charge(&self) -> i32;
    /// The peptide, including modifications
    fn peptide(&self) -> &str;
    /// The protein
    fn protein(&self) -> &str;
    /// The significance score
    fn score(&self) -> f64;
}

impl<Extra> ScoredResult for SearchResult<Extra> {
    fn scan(&self) -> u32 {
        self.scan
    }
    fn charge(&self) -> i32 {
        self.charge
    }
    fn peptide(&self) -> &str {
        &self.peptide_with_mods
    }
    fn protein(&self) -> &str {
        &self.protein
    }
    fn score(&self) -> f64 {
        self.score
    }
}

/// A result with its rank within its scan and its false discovery rate
#[derive(Clone, Debug)]
pub struct RankedResult<T> {
    /// The result
    pub result: T,
    /// 1 based rank within the scan, tied scores share a rank
    pub rank: usize,
    /// The local false discovery rate
    pub fdr: f64,
    /// The Q-value
    pub q_value: f64,
}

impl<T> RankedResult<T> {
    /// Wrap a result without rank or false discovery rate
    pub const fn new(result: T) -> Self {
        Self {
            result,
            rank: 0,
            fdr: 1.0,
            q_value: 1.0,
        }
    }
}

impl<T: ScoredResult> RankedResult<T> {
    /// The score of the wrapped result
    pub fn score(&self) -> f64 {
        self.result.score()
    }
}

/// Rank a group of results that belong to the same scan. The group is sorted best score first,
/// the best result gets rank 1 and the rank is only increased when the score differs from the
/// previous result.
pub fn assign_rank<T: ScoredResult>(group: &mut [RankedResult<T>], orientation: ScoreOrientation) {
    group.sort_by(|a, b| orientation.compare(a.score(), b.score()));
    let mut rank = 0;
    let mut previous: Option<f64> = None;
    for result in group.iter_mut() {
        let score = result.score();
        if previous.is_none_or(|p| (p - score).abs() > f64::EPSILON) {
            rank += 1;
            previous = Some(score);
        }
        result.rank = rank;
    }
}

/// Rank all results per scan, results with different charges in the same scan are ranked
/// together. The results are left sorted on scan and then on rank.
pub fn assign_ranks_per_scan<T: ScoredResult>(
    results: &mut [RankedResult<T>],
    orientation: ScoreOrientation,
) {
    results.sort_by_key(|r| r.result.scan());
    for group in results.chunk_by_mut(|a, b| a.result.scan() == b.result.scan()) {
        assign_rank(group, orientation);
    }
}

/// Keep only the results with a score at least as good as the threshold
pub fn filter_by_threshold<T: ScoredResult>(
    results: Vec<RankedResult<T>>,
    orientation: ScoreOrientation,
    threshold: f64,
) -> Vec<RankedResult<T>> {
    results
        .into_iter()
        .filter(|r| orientation.passes(r.score(), threshold))
        .collect()
}
