//! Decoy based false discovery rate and Q-value estimation

use crate::rank::{RankedResult, ScoreOrientation, ScoredResult};

/// The protein prefixes that are recognised as decoy proteins by default
pub const DEFAULT_DECOY_PREFIXES: &[&str] =
    &["reversed_", "scrambled_", "xxx_", "xxx.", "rev_", "decoy_"];

/// Check if the protein is a decoy protein, meaning it starts with one of the given prefixes (case insensitive)
pub fn is_decoy_protein(protein: &str, decoy_prefixes: &[impl AsRef<str>]) -> bool {
    let protein = protein.trim();
    decoy_prefixes.iter().any(|prefix| {
        let prefix = prefix.as_ref();
        protein
            .get(..prefix.len())
            .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
    })
}

/// Sort results best score first, with ties broken on scan, charge, and peptide so that all rows
/// of a single peptide spectrum match are consecutive.
pub fn sort_for_fdr<T: ScoredResult>(results: &mut [RankedResult<T>], orientation: ScoreOrientation) {
    results.sort_by(|a, b| {
        orientation
            .compare(a.score(), b.score())
            .then_with(|| a.result.scan().cmp(&b.result.scan()))
            .then_with(|| a.result.charge().cmp(&b.result.charge()))
            .then_with(|| a.result.peptide().cmp(b.result.peptide()))
    });
}

/// Calculate the false discovery rate and Q-value for all results, which have to be sorted best
/// score first (see [`sort_for_fdr`]).
///
/// Consecutive rows with the same scan, charge, and peptide are one peptide spectrum match
/// reported for multiple proteins. Such a run is counted as a decoy only if all its proteins are
/// decoys. The FDR for a run is the number of decoy runs divided by the number of forward runs
/// up to and including this run (or 1 if there are no forward runs yet), this is not capped so
/// it can exceed 1 when decoys dominate. The Q-value is the cumulative minimum of the FDR going
/// from the worst to the best result, starting from the FDR of the worst result capped at 1.
///
/// Returns the number of results with a Q-value at or below 0.01.
pub fn compute_fdr<T: ScoredResult>(
    results: &mut [RankedResult<T>],
    decoy_prefixes: &[impl AsRef<str>],
) -> usize {
    let mut forward = 0_u32;
    let mut reverse = 0_u32;
    for run in results.chunk_by_mut(|a, b| {
        a.result.scan() == b.result.scan()
            && a.result.charge() == b.result.charge()
            && a.result.peptide() == b.result.peptide()
    }) {
        if run
            .iter()
            .all(|r| is_decoy_protein(r.result.protein(), decoy_prefixes))
        {
            reverse += 1;
        } else {
            forward += 1;
        }
        let fdr = if forward == 0 {
            1.0
        } else {
            f64::from(reverse) / f64::from(forward)
        };
        for row in run {
            row.fdr = fdr;
        }
    }

    let mut q_value = results.last().map_or(1.0, |r| r.fdr.min(1.0));
    let mut passing = 0;
    for row in results.iter_mut().rev() {
        q_value = q_value.min(row.fdr);
        row.q_value = q_value;
        if q_value <= 0.01 {
            passing += 1;
        }
    }
    passing
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::rank::tests::row;

    #[test]
    fn decoys() {
        assert!(is_decoy_protein("Reversed_P12345", DEFAULT_DECOY_PREFIXES));
        assert!(is_decoy_protein("XXX.sp|P12345", DEFAULT_DECOY_PREFIXES));
        assert!(is_decoy_protein("rev_sp", DEFAULT_DECOY_PREFIXES));
        assert!(!is_decoy_protein("sp|P12345|REV_HUMAN", DEFAULT_DECOY_PREFIXES));
        assert!(!is_decoy_protein("re", DEFAULT_DECOY_PREFIXES));
        assert!(!is_decoy_protein("rév_", &["rev_"]));
    }

    #[test]
    fn forward_and_reverse() {
        let mut results = vec![
            row(4, "PEPTIDE", "P1", 0.99),
            row(1, "AAAK", "P2", 0.98),
            row(1, "AAAK", "XXX_P2", 0.98),
            row(2, "CCCK", "P3", 0.95),
            row(3, "DDDK", "P4", 0.9),
            row(5, "EEEK", "XXX_P5", 0.5),
            row(6, "FFFK", "Reversed_P6", 0.4),
        ];
        sort_for_fdr(&mut results, ScoreOrientation::HigherIsBetter);
        let passing = compute_fdr(&mut results, DEFAULT_DECOY_PREFIXES);
        let fdr: Vec<f64> = results.iter().map(|r| r.fdr).collect();
        assert_eq!(fdr, [0.0, 0.0, 0.0, 0.0, 0.0, 0.25, 0.5]);
        let q: Vec<f64> = results.iter().map(|r| r.q_value).collect();
        assert_eq!(q, [0.0, 0.0, 0.0, 0.0, 0.0, 0.25, 0.5]);
        assert_eq!(passing, 5);
        // The run with a forward and decoy protein is counted once
        assert_eq!(results[1].result.scan, 1);
        assert_eq!(results[2].result.scan, 1);
    }

    #[test]
    fn q_value_monotonic() {
        let mut results = vec![
            row(1, "AAAK", "XXX_P1", 0.001),
            row(2, "CCCK", "P1", 0.002),
            row(3, "DDDK", "P1", 0.003),
            row(4, "EEEK", "XXX_P1", 0.004),
            row(5, "FFFK", "P1", 0.005),
            row(6, "GGGK", "P1", 0.006),
            row(7, "HHHK", "P1", 0.007),
            row(8, "IIIK", "XXX_P1", 0.008),
        ];
        sort_for_fdr(&mut results, ScoreOrientation::LowerIsBetter);
        compute_fdr(&mut results, DEFAULT_DECOY_PREFIXES);
        assert_eq!(results[0].fdr, 1.0);
        for pair in results.windows(2) {
            assert!(pair[0].q_value <= pair[1].q_value);
            assert!(pair[0].q_value <= pair[0].fdr);
        }
        assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.q_value)));
    }

    #[test]
    fn more_decoys_than_forward() {
        let mut results = vec![
            row(1, "AAAK", "P1", 0.001),
            row(2, "CCCK", "XXX_P1", 0.002),
            row(3, "DDDK", "XXX_P2", 0.003),
            row(4, "EEEK", "XXX_P3", 0.004),
        ];
        sort_for_fdr(&mut results, ScoreOrientation::LowerIsBetter);
        compute_fdr(&mut results, DEFAULT_DECOY_PREFIXES);
        let fdr: Vec<f64> = results.iter().map(|r| r.fdr).collect();
        assert_eq!(fdr, [0.0, 1.0, 2.0, 3.0]);
        let q: Vec<f64> = results.iter().map(|r| r.q_value).collect();
        assert_eq!(q, [0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn empty() {
        let mut results: Vec<RankedResult<crate::rank::tests::Row>> = Vec::new();
        assert_eq!(compute_fdr(&mut results, DEFAULT_DECOY_PREFIXES), 0);
    }
}
