//! Prediction records: the immutable, append-only output of scoring one
//! drug pair against one disease.

use crate::topology::TopologyClass;

/// One scored, unordered drug pair against one disease. Immutable once
/// produced; the predictor only ever appends these, in enumeration order,
/// then sorts the whole batch once at the end.
#[derive(Clone, Debug)]
pub struct PredictionRecord {
    pub disease: String,
    pub drug_a: String,
    pub drug_b: String,
    pub tqab: f64,
    pub pqab: f64,
    pub cqab: f64,
    pub prediction_score: f64,
    pub topology_class: TopologyClass,
    pub pqa: f64,
    pub pqb: f64,
    pub cqa: f64,
    pub cqb: f64,
    /// `true` if any component fell back to a zero score because of a
    /// recorded [`crate::diagnostics::Diagnostic`] rather than a genuine
    /// computation.
    pub flagged: bool,
}

impl PredictionRecord {
    /// Returns the sort key used for the final, deterministic ordering:
    /// descending total score, then lexicographic on (`drug_a`, `drug_b`)
    /// to remove any dependency on thread interleaving.
    #[must_use]
    pub fn sort_key(&self) -> (std::cmp::Reverse<ordered_float::TotalF64>, String, String) {
        (
            std::cmp::Reverse(ordered_float::TotalF64(self.prediction_score)),
            self.drug_a.clone(),
            self.drug_b.clone(),
        )
    }
}

/// A small, dependency-free total-ordering wrapper for `f64`, used only to
/// sort prediction records deterministically. Scores are always finite
/// sums of finite components, so `NaN` handling is not a concern here.
pub mod ordered_float {
    use std::cmp::Ordering;

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct TotalF64(pub f64);

    impl Eq for TotalF64 {}

    impl PartialOrd for TotalF64 {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for TotalF64 {
        fn cmp(&self, other: &Self) -> Ordering {
            self.0.total_cmp(&other.0)
        }
    }
}

#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "test fixtures have known, fixed lengths")]
mod tests {
    use super::*;

    fn record(drug_a: &str, drug_b: &str, score: f64) -> PredictionRecord {
        PredictionRecord {
            disease: "d1".into(),
            drug_a: drug_a.into(),
            drug_b: drug_b.into(),
            tqab: 0.0,
            pqab: 0.0,
            cqab: 0.0,
            prediction_score: score,
            topology_class: TopologyClass::Redundant,
            pqa: 0.0,
            pqb: 0.0,
            cqa: 0.0,
            cqb: 0.0,
            flagged: false,
        }
    }

    #[test]
    fn sort_key_breaks_ties_lexicographically() {
        let mut records = vec![record("Z", "A", 1.0), record("A", "B", 1.0)];
        records.sort_by_key(PredictionRecord::sort_key);
        assert_eq!(records[0].drug_a, "A");
    }

    #[test]
    fn sort_key_orders_by_descending_score_first() {
        let mut records = vec![record("A", "B", 0.1), record("C", "D", 0.9)];
        records.sort_by_key(PredictionRecord::sort_key);
        assert_eq!(records[0].drug_a, "C");
    }
}
