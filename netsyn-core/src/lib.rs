//! Scoring core for a network-based synergistic drug-pair predictor.
//!
//! Given an interaction graph, a disease module (and optional signature),
//! and a collection of drug modules, this crate ranks every unordered drug
//! pair by a composite of topological, proximity, and transcriptional
//! signals. See [`predictor::Predictor`] for the entry point.

mod config;
mod degree_bins;
mod diagnostics;
mod error;
mod evaluation;
mod gene;
mod graph;
mod module;
mod null_model;
mod predictor;
mod proximity;
mod result;
mod rng;
mod topology;
mod transcriptional;

pub use crate::{
    config::{ConfigError, ScoringConfig},
    degree_bins::DegreeBinTable,
    diagnostics::{Diagnostic, DiagnosticReport},
    error::{NetsynError, NetsynErrorCode, Result},
    evaluation::{EvaluationSummary, auc_pr, auc_roc, evaluate as evaluate_predictions},
    gene::{GeneId, GeneInterner},
    graph::{DistanceCache, EdgeTriple, GraphIndex, SENTINEL_DISTANCE},
    module::{DiseaseModule, DrugModule},
    null_model::{NullSamples, sample as sample_null_model},
    predictor::Predictor,
    proximity::{
        NormalizedProximity, normalized_proximity, pair_proximity_score, separation_score,
    },
    result::PredictionRecord,
    rng::{mix_task_seed, splitmix64, task_rng},
    topology::{
        TopologyClass, TopologyOutcome, TopologyThresholds, classify as classify_topology,
    },
    transcriptional::{
        TranscriptionalOutcome, pair_transcriptional_score, score_drug as score_transcriptional,
    },
};
