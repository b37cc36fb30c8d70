//! Proximity and separation engines.
//!
//! Raw proximity is the average-min shortest-path distance between two gene
//! sets; z-score normalization compares that raw value against a
//! degree-preserving null model so that proximity is reported relative to
//! what would be expected by chance for a module of the same size and
//! degree profile.

use rand::RngCore;

use crate::degree_bins::DegreeBinTable;
use crate::gene::GeneId;
use crate::graph::DistanceCache;
use crate::null_model;

/// The outcome of normalizing a raw proximity value against its null model.
#[derive(Clone, Copy, Debug)]
pub struct NormalizedProximity {
    /// `dist_set_to_set(disease, module)`.
    pub observed: f64,
    /// `(observed - mean) / stdev` over the null distribution.
    pub z: f64,
    /// Empirical one-tailed p-value: the fraction of null draws at least as
    /// close as the observed distance.
    pub p_value: f64,
    /// `true` if the null distribution had zero standard deviation, in
    /// which case `z` was forced to `0.0`.
    pub null_degenerate: bool,
    /// `true` if any null draw had to relax into a neighboring degree bin.
    pub bin_relaxed: bool,
}

/// Computes the observed proximity of `module` to `disease` and normalizes
/// it against `n_samples` degree-preserving randomizations of `module`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "mean/stdev/z-score arithmetic over a real-valued null distribution"
)]
pub fn normalized_proximity(
    cache: &mut DistanceCache<'_>,
    disease: &[GeneId],
    module: &[GeneId],
    bins: &DegreeBinTable,
    n_samples: usize,
    rng: &mut dyn RngCore,
) -> NormalizedProximity {
    let observed = cache.dist_set_to_set(disease, module);

    let null_samples = null_model::sample(module, n_samples, bins, rng);
    let null_distances: Vec<f64> = null_samples
        .as_slice()
        .iter()
        .map(|random_module| cache.dist_set_to_set(disease, random_module))
        .collect();

    let count = null_distances.len() as f64;
    let mean = if null_distances.is_empty() {
        0.0
    } else {
        null_distances.iter().sum::<f64>() / count
    };
    let variance = if null_distances.is_empty() {
        0.0
    } else {
        null_distances
            .iter()
            .map(|d| (d - mean).powi(2))
            .sum::<f64>()
            / count
    };
    let stdev = variance.sqrt();

    let (z, null_degenerate) = if stdev == 0.0 {
        tracing::warn!(observed, mean, "null distribution has zero standard deviation; forcing z=0");
        (0.0, true)
    } else {
        ((observed - mean) / stdev, false)
    };

    let p_value = if null_distances.is_empty() {
        0.0
    } else {
        let at_least_as_close = null_distances.iter().filter(|&&d| d <= observed).count();
        at_least_as_close as f64 / count
    };

    NormalizedProximity {
        observed,
        z,
        p_value,
        null_degenerate,
        bin_relaxed: null_samples.bin_relaxed,
    }
}

/// Combines two drugs' z-scores against the same disease into the pair
/// proximity score `P_{Q,AB} = -(z_a + z_b) / 2`. The sign is inverted so
/// pairs closer than random receive a positive contribution.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "averaging two z-scores")]
pub fn pair_proximity_score(z_a: f64, z_b: f64) -> f64 {
    -(z_a + z_b) / 2.0
}

/// Computes the separation score `s(A, B) = (d_AB + d_BA)/2 - (d_AA +
/// d_BB)/2`. Positive values indicate separated modules; negative values
/// indicate overlapping or nested ones.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "averaging four set-to-set distances")]
pub fn separation_score(cache: &mut DistanceCache<'_>, a: &[GeneId], b: &[GeneId]) -> f64 {
    let d_ab = cache.dist_set_to_set(a, b);
    let d_ba = cache.dist_set_to_set(b, a);
    let d_aa = cache.dist_set_to_set(a, a);
    let d_bb = cache.dist_set_to_set(b, b);
    (d_ab + d_ba) / 2.0 - (d_aa + d_bb) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeTriple, GraphIndex};
    use crate::rng::task_rng;

    #[test]
    fn bridged_triangles_are_separated() {
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
        assert!(separation_score(&mut cache, &a, &b) > 0.0);
    }

    #[test]
    fn degenerate_null_forces_zero_z_score() {
        let edges = [EdgeTriple { gene_a: "A", gene_b: "B", source_tag: "t" }];
        let (graph, _) = GraphIndex::build(&edges, 1);
        let mut cache = DistanceCache::new(&graph);
        let disease = [graph.gene_id("A").expect("interned")];
        let module = [graph.gene_id("B").expect("interned")];
        let bins = graph.degree_bins();
        let mut rng = task_rng(1, 0, 0, 0);
        let result = normalized_proximity(&mut cache, &disease, &module, bins, 10, &mut rng);
        assert!(result.null_degenerate);
        assert!((result.z - 0.0).abs() < f64::EPSILON);
    }
}
