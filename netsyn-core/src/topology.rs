//! Topology classifier.
//!
//! Classifies a drug pair against a disease module as complementary,
//! intermediate, or redundant, based on module separation and each drug's
//! distance to the disease.

use crate::gene::GeneId;
use crate::graph::DistanceCache;
use crate::proximity::separation_score;

/// The classification of a drug pair's footprint relative to a disease
/// module.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TopologyClass {
    /// Separated modules (`s_AB > 0`) both close to the disease.
    Complementary,
    /// Separated modules where at least one is not close to the disease.
    Intermediate,
    /// Overlapping or nested modules (`s_AB <= 0`).
    Redundant,
}

impl TopologyClass {
    /// Returns the stable lowercase name used in prediction output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complementary => "complementary",
            Self::Intermediate => "intermediate",
            Self::Redundant => "redundant",
        }
    }
}

/// Tunable thresholds for the topology classifier, mirroring the
/// configuration seam described for `close_threshold`, `K`, and `L`.
#[derive(Clone, Copy, Debug)]
pub struct TopologyThresholds {
    pub close_threshold: f64,
    pub k: f64,
    pub l: f64,
}

impl Default for TopologyThresholds {
    fn default() -> Self {
        Self {
            close_threshold: 3.0,
            k: 10.0,
            l: 5.0,
        }
    }
}

/// The topology classifier's verdict: a class and its associated score.
#[derive(Clone, Copy, Debug)]
pub struct TopologyOutcome {
    pub class: TopologyClass,
    pub score: f64,
}

/// Classifies drug modules `a` and `b` against disease module `disease`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "classification score is a linear function of real-valued distances"
)]
pub fn classify(
    cache: &mut DistanceCache<'_>,
    disease: &[GeneId],
    a: &[GeneId],
    b: &[GeneId],
    thresholds: TopologyThresholds,
) -> TopologyOutcome {
    let s_ab = separation_score(cache, a, b);
    let d_aq = cache.dist_set_to_set(a, disease);
    let d_bq = cache.dist_set_to_set(b, disease);
    let mean_distance = (d_aq + d_bq) / 2.0;

    if s_ab > 0.0 {
        let both_close = d_aq < thresholds.close_threshold && d_bq < thresholds.close_threshold;
        if both_close {
            TopologyOutcome {
                class: TopologyClass::Complementary,
                score: 1.0 - mean_distance / thresholds.k,
            }
        } else {
            TopologyOutcome {
                class: TopologyClass::Intermediate,
                score: 0.5 - mean_distance / thresholds.k,
            }
        }
    } else {
        TopologyOutcome {
            class: TopologyClass::Redundant,
            score: -s_ab.abs() / thresholds.l,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeTriple, GraphIndex};

    #[test]
    fn bridged_triangles_classify_complementary() {
        let edges = [
            EdgeTriple { gene_a: "A1", gene_b: "A2", source_tag: "t" },
            EdgeTriple { gene_a: "A2", gene_b: "A3", source_tag: "t" },
            EdgeTriple { gene_a: "A1", gene_b: "A3", source_tag: "t" },
            EdgeTriple { gene_a: "B1", gene_b: "B2", source_tag: "t" },
            EdgeTriple { gene_a: "B2", gene_b: "B3", source_tag: "t" },
            EdgeTriple { gene_a: "B1", gene_b: "B3", source_tag: "t" },
            EdgeTriple { gene_a: "A1", gene_b: "B1", source_tag: "t" },
        ];
        let (graph, _) = GraphIndex::build(&edges, 1);
        let mut cache = DistanceCache::new(&graph);
        let a: Vec<GeneId> = ["A1", "A2", "A3"]
            .iter()
            .map(|s| graph.gene_id(s).expect("interned"))
            .collect();
        let b: Vec<GeneId> = ["B1", "B2", "B3"]
            .iter()
            .map(|s| graph.gene_id(s).expect("interned"))
            .collect();
        let q: Vec<GeneId> = ["A2", "B2"]
            .iter()
            .map(|s| graph.gene_id(s).expect("interned"))
            .collect();
        let outcome = classify(&mut cache, &q, &a, &b, TopologyThresholds::default());
        assert_eq!(outcome.class, TopologyClass::Complementary);
    }

    #[test]
    fn every_pair_gets_exactly_one_class() {
        // Totality is structural: `classify` always returns one of the
        // three variants, never an `Option` or `Result`.
        let edges = [EdgeTriple { gene_a: "A", gene_b: "B", source_tag: "t" }];
        let (graph, _) = GraphIndex::build(&edges, 1);
        let mut cache = DistanceCache::new(&graph);
        let a = [graph.gene_id("A").expect("interned")];
        let b = [graph.gene_id("B").expect("interned")];
        let outcome = classify(&mut cache, &a, &a, &b, TopologyThresholds::default());
        match outcome.class {
            TopologyClass::Complementary | TopologyClass::Intermediate | TopologyClass::Redundant => {}
        }
    }
}
