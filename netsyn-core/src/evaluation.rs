//! Evaluation of a prediction run against a reference set of known
//! synergistic drug pairs.
//!
//! Labels are assigned by canonicalized `(drug_a, drug_b)` pair membership
//! rather than by any score threshold, mirroring the reference evaluation
//! script's approach of comparing predictions against a held-out set rather
//! than a classifier's default decision boundary.

use std::cmp::Ordering;

/// Summary statistics for one evaluated disease.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluationSummary {
    /// Area under the ROC curve, or `None` if `labels` contained fewer than
    /// two classes (AUC is undefined with only positives or only negatives).
    pub auc_roc: Option<f64>,
    /// Average precision (area under the precision-recall curve), or `None`
    /// under the same single-class condition as `auc_roc`.
    pub auc_pr: Option<f64>,
    /// Number of predicted pairs evaluated.
    pub n_predictions: usize,
    /// Size of the known-synergy reference set for this disease.
    pub n_known_synergies: usize,
    /// Number of predicted pairs that matched a known synergy.
    pub n_true_positives: usize,
}

/// Scores every prediction against a binary synergy label and summarizes the
/// result. `labels_and_scores` pairs each prediction's canonicalized-pair
/// membership outcome with its `prediction_score`.
#[must_use]
pub fn evaluate(labels_and_scores: &[(bool, f64)], n_known_synergies: usize) -> EvaluationSummary {
    let n_true_positives = labels_and_scores.iter().filter(|(label, _)| *label).count();
    EvaluationSummary {
        auc_roc: auc_roc(labels_and_scores),
        auc_pr: auc_pr(labels_and_scores),
        n_predictions: labels_and_scores.len(),
        n_known_synergies,
        n_true_positives,
    }
}

/// Computes AUC-ROC as the Mann-Whitney U statistic over prediction scores,
/// normalized by `n_pos * n_neg`. Ties share the average rank. Returns
/// `None` if `labels_and_scores` does not contain both a positive and a
/// negative label.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "rank-sum AUC computation over real-valued scores"
)]
pub fn auc_roc(labels_and_scores: &[(bool, f64)]) -> Option<f64> {
    let n_pos = labels_and_scores.iter().filter(|(label, _)| *label).count();
    let n_neg = labels_and_scores.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let ranks = average_ranks(labels_and_scores);
    let rank_sum_pos: f64 = labels_and_scores
        .iter()
        .zip(&ranks)
        .filter(|((label, _), _)| *label)
        .map(|(_, rank)| rank)
        .sum();

    #[expect(clippy::cast_precision_loss, reason = "pair counts fit f64 exactly at this scale")]
    let (n_pos_f, n_neg_f) = (n_pos as f64, n_neg as f64);
    let u = rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0;
    Some(u / (n_pos_f * n_neg_f))
}

/// Computes average precision (area under the precision-recall curve) by
/// sweeping score thresholds from highest to lowest, grouping tied scores
/// into a single threshold the way `sklearn.metrics.precision_recall_curve`
/// does. Returns `None` under the same single-class condition as
/// [`auc_roc`].
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "precision/recall accumulation over real-valued scores"
)]
pub fn auc_pr(labels_and_scores: &[(bool, f64)]) -> Option<f64> {
    let n_pos = labels_and_scores.iter().filter(|(label, _)| *label).count();
    let n_neg = labels_and_scores.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut sorted: Vec<(bool, f64)> = labels_and_scores.to_vec();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    #[expect(clippy::cast_precision_loss, reason = "pair counts fit f64 exactly at this scale")]
    let n_pos_f = n_pos as f64;

    let mut average_precision = 0.0;
    let mut prev_recall = 0.0;
    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < sorted.len() {
        let threshold = sorted[i].1;
        let mut j = i;
        while j < sorted.len() && sorted[j].1 == threshold {
            if sorted[j].0 {
                tp += 1;
            } else {
                fp += 1;
            }
            j += 1;
        }
        #[expect(clippy::cast_precision_loss, reason = "pair counts fit f64 exactly at this scale")]
        let (tp_f, fp_f) = (tp as f64, fp as f64);
        let precision = tp_f / (tp_f + fp_f);
        let recall = tp_f / n_pos_f;
        average_precision += (recall - prev_recall) * precision;
        prev_recall = recall;
        i = j;
    }
    Some(average_precision)
}

/// Average ranks (1-based, ties sharing the mean rank) of `labels_and_scores`
/// by ascending score, in input order.
fn average_ranks(labels_and_scores: &[(bool, f64)]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..labels_and_scores.len()).collect();
    order.sort_by(|&a, &b| {
        labels_and_scores[a]
            .1
            .partial_cmp(&labels_and_scores[b].1)
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; labels_and_scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len()
            && labels_and_scores[order[j + 1]].1 == labels_and_scores[order[i]].1
        {
            j += 1;
        }
        #[expect(clippy::cast_precision_loss, reason = "rank positions fit f64 exactly at this scale")]
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for position in order.iter().take(j + 1).skip(i) {
            ranks[*position] = avg_rank;
        }
        i = j + 1;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_separation_scores_one() {
        let data = [(false, 0.1), (false, 0.2), (true, 0.8), (true, 0.9)];
        assert!((auc_roc(&data).expect("two classes") - 1.0).abs() < f64::EPSILON);
        assert!((auc_pr(&data).expect("two classes") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn inverted_separation_scores_zero() {
        let data = [(true, 0.1), (true, 0.2), (false, 0.8), (false, 0.9)];
        assert!((auc_roc(&data).expect("two classes") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tied_scores_split_rank() {
        let data = [(false, 0.5), (true, 0.5)];
        assert!((auc_roc(&data).expect("two classes") - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn single_class_is_undefined() {
        let data = [(true, 0.1), (true, 0.9)];
        assert_eq!(auc_roc(&data), None);
        assert_eq!(auc_pr(&data), None);
    }

    #[test]
    fn summary_counts_true_positives_and_reference_size() {
        let data = [(false, 0.1), (true, 0.9)];
        let summary = evaluate(&data, 5);
        assert_eq!(summary.n_predictions, 2);
        assert_eq!(summary.n_true_positives, 1);
        assert_eq!(summary.n_known_synergies, 5);
    }
}
