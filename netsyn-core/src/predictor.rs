//! Predictor orchestrator.
//!
//! For a single disease, enumerates every unordered drug pair, dispatches
//! the topology, proximity, and transcriptional components, composes the
//! total score, and returns records sorted by the run's deterministic tie
//! -break key.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use rayon::prelude::*;

use crate::config::ScoringConfig;
use crate::diagnostics::{Diagnostic, DiagnosticReport};
use crate::graph::{DistanceCache, GraphIndex};
use crate::module::{DiseaseModule, DrugModule};
use crate::proximity::{normalized_proximity, pair_proximity_score};
use crate::result::PredictionRecord;
use crate::rng::task_rng;
use crate::topology::{TopologyClass, TopologyOutcome, classify};
use crate::transcriptional::{pair_transcriptional_score, score_drug};

/// Number of pairs handed to one worker chunk at a time. Each chunk owns a
/// single [`DistanceCache`], so this bounds how long a cache lives before
/// being dropped and rebuilt for the next chunk.
const CHUNK_SIZE: usize = 64;

/// Orchestrates scoring of all drug pairs for one disease against a fixed
/// [`GraphIndex`] and [`ScoringConfig`].
pub struct Predictor<'g> {
    graph: &'g GraphIndex,
    config: ScoringConfig,
}

impl<'g> Predictor<'g> {
    /// Creates a predictor bound to `graph` and `config`.
    #[must_use]
    pub fn new(graph: &'g GraphIndex, config: ScoringConfig) -> Self {
        Self { graph, config }
    }

    /// Scores every unordered pair over `drugs` against `disease`,
    /// returning records sorted by the deterministic tie-break key and a
    /// report of any non-fatal conditions encountered.
    ///
    /// `disease_id` identifies the disease for sub-seed derivation; callers
    /// must assign a stable id per disease across a run (e.g. its index in
    /// the enumeration order) for reproducibility to hold.
    #[must_use]
    pub fn predict(
        &self,
        disease_id: u32,
        disease: &DiseaseModule,
        drugs: &[DrugModule],
    ) -> (Vec<PredictionRecord>, DiagnosticReport) {
        self.predict_cancellable(disease_id, disease, drugs, &AtomicBool::new(false))
    }

    /// As [`Predictor::predict`], but checks `cancelled` between chunks and
    /// stops early, returning only the pairs already scored.
    #[must_use]
    #[tracing::instrument(skip(self, disease, drugs, cancelled), fields(disease = disease.name(), n_drugs = drugs.len()))]
    pub fn predict_cancellable(
        &self,
        disease_id: u32,
        disease: &DiseaseModule,
        drugs: &[DrugModule],
        cancelled: &AtomicBool,
    ) -> (Vec<PredictionRecord>, DiagnosticReport) {
        let mut report = DiagnosticReport::new();
        if self.graph.dropped_vertex_count() > 0 {
            report.push(Diagnostic::ComponentsDropped {
                dropped_vertex_count: self.graph.dropped_vertex_count(),
            });
        }
        if disease.is_empty() {
            report.push(Diagnostic::EmptyOverlap {
                disease: disease.name().to_owned(),
                module: disease.name().to_owned(),
            });
        }

        let pairs = enumerate_pairs(drugs.len(), self.config.max_pairs);

        #[expect(
            clippy::indexing_slicing,
            reason = "pair indices are produced by enumerate_pairs and stay within drugs.len()"
        )]
        fn score_chunk<'g>(
            predictor: &Predictor<'g>,
            disease_id: u32,
            disease: &DiseaseModule,
            drugs: &[DrugModule],
            chunk: &[(usize, usize)],
        ) -> (Vec<PredictionRecord>, DiagnosticReport) {
            let mut cache = DistanceCache::new(predictor.graph);
            let mut chunk_report = DiagnosticReport::new();
            let mut records = Vec::with_capacity(chunk.len());
            for &(i, j) in chunk {
                let (record, pair_diagnostics) = predictor.score_pair(
                    disease_id,
                    disease,
                    &drugs[i],
                    &drugs[j],
                    u32::try_from(i).unwrap_or(u32::MAX),
                    u32::try_from(j).unwrap_or(u32::MAX),
                    &mut cache,
                );
                chunk_report.extend(pair_diagnostics);
                records.push(record);
            }
            (records, chunk_report)
        }

        let chunks: Vec<&[(usize, usize)]> = pairs.chunks(CHUNK_SIZE).collect();
        let chunk_results: Vec<(Vec<PredictionRecord>, DiagnosticReport)> = chunks
            .into_par_iter()
            .map(|chunk| {
                if cancelled.load(AtomicOrdering::Relaxed) {
                    return (Vec::new(), DiagnosticReport::new());
                }
                score_chunk(self, disease_id, disease, drugs, chunk)
            })
            .collect();

        let mut records = Vec::with_capacity(pairs.len());
        for (chunk_records, chunk_report) in chunk_results {
            records.extend(chunk_records);
            report.extend(chunk_report);
        }

        records.sort_by_key(PredictionRecord::sort_key);
        if cancelled.load(AtomicOrdering::Relaxed) {
            tracing::warn!(
                completed = records.len(),
                total = pairs.len(),
                "prediction run cancelled before completion"
            );
        }
        tracing::info!(n_records = records.len(), n_diagnostics = report.len(), "disease scored");
        (records, report)
    }

    #[expect(clippy::float_arithmetic, reason = "weighted sum of three real-valued component scores")]
    #[expect(clippy::too_many_arguments, reason = "mirrors the orchestrator's single scoring step")]
    fn score_pair(
        &self,
        disease_id: u32,
        disease: &DiseaseModule,
        a: &DrugModule,
        b: &DrugModule,
        a_id: u32,
        b_id: u32,
        cache: &mut DistanceCache<'_>,
    ) -> (PredictionRecord, DiagnosticReport) {
        let mut diagnostics = DiagnosticReport::new();
        let mut flagged = false;

        if a.is_empty() {
            diagnostics.push(Diagnostic::EmptyOverlap {
                disease: disease.name().to_owned(),
                module: a.name().to_owned(),
            });
            flagged = true;
        }
        if b.is_empty() {
            diagnostics.push(Diagnostic::EmptyOverlap {
                disease: disease.name().to_owned(),
                module: b.name().to_owned(),
            });
            flagged = true;
        }

        let thresholds = self.config.topology_thresholds();
        let topology = if disease.is_empty() || a.is_empty() || b.is_empty() {
            // An empty module has no member in the retained component, so
            // `classify` would fall back to the `SENTINEL_DISTANCE` stand-in
            // and report a large, meaningless score. Zero it instead of
            // letting the sentinel leak into the composite score.
            TopologyOutcome { class: TopologyClass::Redundant, score: 0.0 }
        } else {
            classify(cache, disease.genes(), &a.footprint(), &b.footprint(), thresholds)
        };

        let mut rng = task_rng(self.config.random_seed, disease_id, a_id, b_id);
        let proximity_a = normalized_proximity(
            cache,
            disease.genes(),
            &a.footprint(),
            self.graph.degree_bins(),
            self.config.n_randomizations,
            &mut rng,
        );
        let proximity_b = normalized_proximity(
            cache,
            disease.genes(),
            &b.footprint(),
            self.graph.degree_bins(),
            self.config.n_randomizations,
            &mut rng,
        );
        if proximity_a.null_degenerate || proximity_b.null_degenerate {
            diagnostics.push(Diagnostic::NullDegenerate {
                disease: disease.name().to_owned(),
                drug: format!("{}/{}", a.name(), b.name()),
            });
        }
        if proximity_a.bin_relaxed || proximity_b.bin_relaxed {
            diagnostics.push(Diagnostic::DegreeBinRelaxed {
                disease: disease.name().to_owned(),
                drug: format!("{}/{}", a.name(), b.name()),
            });
        }
        let pqab = pair_proximity_score(proximity_a.z, proximity_b.z);

        let (cqa, cqb, cqab) = if disease.signature().is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let outcome_a = score_drug(disease, a);
            let outcome_b = score_drug(disease, b);
            if outcome_a.insufficient_common_genes {
                diagnostics.push(Diagnostic::InsufficientCommonGenes {
                    disease: disease.name().to_owned(),
                    drug: a.name().to_owned(),
                });
            }
            if outcome_b.insufficient_common_genes {
                diagnostics.push(Diagnostic::InsufficientCommonGenes {
                    disease: disease.name().to_owned(),
                    drug: b.name().to_owned(),
                });
            }
            (
                outcome_a.score,
                outcome_b.score,
                pair_transcriptional_score(outcome_a.score, outcome_b.score),
            )
        };

        let (weight_t, weight_p, weight_c) = self.config.component_weights;
        let prediction_score =
            weight_t * topology.score + weight_p * pqab + weight_c * cqab;

        let record = PredictionRecord {
            disease: disease.name().to_owned(),
            drug_a: a.name().to_owned(),
            drug_b: b.name().to_owned(),
            tqab: topology.score,
            pqab,
            cqab,
            prediction_score,
            topology_class: topology.class,
            pqa: proximity_a.z,
            pqb: proximity_b.z,
            cqa,
            cqb,
            flagged,
        };

        (record, diagnostics)
    }
}

fn enumerate_pairs(n: usize, max_pairs: Option<usize>) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    'outer: for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
            if let Some(limit) = max_pairs {
                if pairs.len() >= limit {
                    break 'outer;
                }
            }
        }
    }
    pairs
}

#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "test fixtures have known, fixed lengths")]
mod tests {
    use super::*;
    use crate::graph::EdgeTriple;

    fn triangle_pair_graph() -> GraphIndex {
        let edges = [
            EdgeTriple { gene_a: "A1", gene_b: "A2", source_tag: "t" },
            EdgeTriple { gene_a: "A2", gene_b: "A3", source_tag: "t" },
            EdgeTriple { gene_a: "A1", gene_b: "A3", source_tag: "t" },
            EdgeTriple { gene_a: "B1", gene_b: "B2", source_tag: "t" },
            EdgeTriple { gene_a: "B2", gene_b: "B3", source_tag: "t" },
            EdgeTriple { gene_a: "B1", gene_b: "B3", source_tag: "t" },
            EdgeTriple { gene_a: "A1", gene_b: "B1", source_tag: "t" },
        ];
        GraphIndex::build(&edges, 1).0
    }

    #[test]
    fn composition_has_no_hidden_rescaling() {
        let graph = triangle_pair_graph();
        let config = ScoringConfig {
            n_randomizations: 20,
            ..ScoringConfig::default()
        };
        let predictor = Predictor::new(&graph, config);
        let disease = DiseaseModule::bind(&graph, "d1", &["A2".into(), "B2".into()]);
        let drug_a = DrugModule::bind(&graph, "A", &["A1".into()], &["A3".into()]);
        let drug_b = DrugModule::bind(&graph, "B", &["B1".into()], &["B3".into()]);
        let (records, _) = predictor.predict(0, &disease, &[drug_a, drug_b]);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        let expected = record.tqab + record.pqab + record.cqab;
        assert!((record.prediction_score - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_drug_module_zeroes_topology_score_and_flags() {
        let graph = triangle_pair_graph();
        let config = ScoringConfig {
            n_randomizations: 5,
            ..ScoringConfig::default()
        };
        let predictor = Predictor::new(&graph, config);
        let disease = DiseaseModule::bind(&graph, "d1", &["A2".into(), "B2".into()]);
        let drug_a = DrugModule::bind(&graph, "A", &["A1".into()], &["A3".into()]);
        let empty_drug = DrugModule::bind(&graph, "empty", &["ZZZ".into()], &[]);
        let (records, report) = predictor.predict(0, &disease, &[drug_a, empty_drug]);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!((record.tqab - 0.0).abs() < f64::EPSILON);
        assert!(record.flagged);
        assert!(!report.is_empty());
    }

    #[test]
    fn max_pairs_caps_enumeration() {
        let graph = triangle_pair_graph();
        let config = ScoringConfig {
            n_randomizations: 5,
            max_pairs: Some(1),
            ..ScoringConfig::default()
        };
        let predictor = Predictor::new(&graph, config);
        let disease = DiseaseModule::bind(&graph, "d1", &["A2".into()]);
        let drugs = vec![
            DrugModule::bind(&graph, "A", &["A1".into()], &[]),
            DrugModule::bind(&graph, "B", &["B1".into()], &[]),
            DrugModule::bind(&graph, "C", &["A3".into()], &[]),
        ];
        let (records, _) = predictor.predict(0, &disease, &drugs);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn determinism_across_two_runs() {
        let graph = triangle_pair_graph();
        let config = ScoringConfig {
            n_randomizations: 30,
            ..ScoringConfig::default()
        };
        let disease = DiseaseModule::bind(&graph, "d1", &["A2".into(), "B2".into()]);
        let drugs = vec![
            DrugModule::bind(&graph, "A", &["A1".into()], &["A3".into()]),
            DrugModule::bind(&graph, "B", &["B1".into()], &["B3".into()]),
        ];

        let predictor = Predictor::new(&graph, config);
        let (first, _) = predictor.predict(0, &disease, &drugs);
        let (second, _) = predictor.predict(0, &disease, &drugs);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert!((a.prediction_score - b.prediction_score).abs() < f64::EPSILON);
        }
    }
}
