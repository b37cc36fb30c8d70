//! Transcriptional rank-correlation scorer.
//!
//! Each drug is represented by a signed vector over its up/down footprint;
//! its transcriptional score is the negated Spearman rank correlation
//! against the disease signature, restricted to genes present in both —
//! a drug that reverses the disease signature scores positively.

use std::cmp::Ordering;

use crate::gene::GeneId;
use crate::module::{DiseaseModule, DrugModule};

/// Minimum number of genes the disease signature and a drug's signed
/// footprint must share for a correlation to be meaningful.
const MIN_COMMON_GENES: usize = 3;

/// The outcome of scoring one drug's transcriptional reversal of a disease
/// signature.
#[derive(Clone, Copy, Debug)]
pub struct TranscriptionalOutcome {
    /// `-rho`, the negated Spearman correlation.
    pub score: f64,
    /// `true` if fewer than [`MIN_COMMON_GENES`] genes were shared, in
    /// which case `score` was forced to `0.0`.
    pub insufficient_common_genes: bool,
}

/// Scores how strongly `drug` reverses `disease`'s transcriptional
/// signature.
#[must_use]
pub fn score_drug(disease: &DiseaseModule, drug: &DrugModule) -> TranscriptionalOutcome {
    let mut common: Vec<GeneId> = disease
        .signature()
        .keys()
        .copied()
        .filter(|gene| drug.signed_value(*gene).is_some())
        .collect();
    common.sort_unstable();

    if common.len() < MIN_COMMON_GENES {
        return TranscriptionalOutcome {
            score: 0.0,
            insufficient_common_genes: true,
        };
    }

    let disease_values: Vec<f64> = common
        .iter()
        .filter_map(|gene| disease.signature_value(*gene))
        .collect();
    let drug_values: Vec<f64> = common
        .iter()
        .filter_map(|gene| drug.signed_value(*gene))
        .collect();

    let rho = spearman_rho(&disease_values, &drug_values);
    TranscriptionalOutcome {
        score: -rho,
        insufficient_common_genes: false,
    }
}

/// Combines two drugs' transcriptional scores into the pair score
/// `C_{Q,AB} = (c_a + c_b) / 2`.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "averaging two correlation scores")]
pub fn pair_transcriptional_score(c_a: f64, c_b: f64) -> f64 {
    (c_a + c_b) / 2.0
}

#[expect(
    clippy::float_arithmetic,
    reason = "rank-average and Pearson-on-ranks arithmetic over real-valued vectors"
)]
fn spearman_rho(x: &[f64], y: &[f64]) -> f64 {
    pearson(&average_ranks(x), &average_ranks(y))
}

#[expect(
    clippy::indexing_slicing,
    reason = "indices are drawn from a sort of 0..values.len() and stay in range"
)]
#[expect(clippy::float_arithmetic, reason = "computing average ranks for tied values")]
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let average_rank = (i + j) as f64 / 2.0 + 1.0;
        for slot in order.iter().take(j + 1).skip(i) {
            ranks[*slot] = average_rank;
        }
        i = j + 1;
    }
    ranks
}

#[expect(
    clippy::float_arithmetic,
    reason = "Pearson correlation over real-valued rank vectors"
)]
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    if sum_sq_x == 0.0 || sum_sq_y == 0.0 {
        0.0
    } else {
        numerator / (sum_sq_x.sqrt() * sum_sq_y.sqrt())
    }
}
