//! Degree-preserving null-model sampler.
//!
//! For each gene in a module, replacement candidates are drawn from the
//! degree bin the gene belongs to. Draws are with replacement *across*
//! samples but without replacement *within* a single sample, so every
//! generated set has exactly as many distinct members as the module it
//! stands in for.

use std::collections::HashSet;

use rand::RngCore;
use rand::seq::SliceRandom;

use crate::degree_bins::DegreeBinTable;
use crate::gene::GeneId;

/// The result of drawing `n_samples` degree-preserving randomizations of a
/// module.
#[derive(Clone, Debug)]
pub struct NullSamples {
    samples: Vec<Vec<GeneId>>,
    /// `true` if any draw had to relax into a neighboring degree bin
    /// because its own bin's pool was exhausted.
    pub bin_relaxed: bool,
}

impl NullSamples {
    /// Returns the generated samples.
    #[must_use]
    pub fn as_slice(&self) -> &[Vec<GeneId>] {
        &self.samples
    }

    /// Returns the number of samples generated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no samples were generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Draws `n_samples` degree-preserving randomizations of `module` using
/// `bins` and the supplied RNG.
///
/// The RNG must already be seeded deterministically for the calling task
/// (see [`crate::rng::task_rng`]); this function never touches global RNG
/// state.
#[must_use]
pub fn sample(
    module: &[GeneId],
    n_samples: usize,
    bins: &DegreeBinTable,
    rng: &mut dyn RngCore,
) -> NullSamples {
    let mut samples = Vec::with_capacity(n_samples);
    let mut bin_relaxed = false;

    for _ in 0..n_samples {
        let (drawn, relaxed) = sample_one(module, bins, rng);
        bin_relaxed |= relaxed;
        samples.push(drawn);
    }

    if bin_relaxed {
        tracing::warn!(
            module_size = module.len(),
            n_samples,
            "degree-bin pool exhausted; relaxed sampling into a neighboring bin"
        );
    }

    NullSamples {
        samples,
        bin_relaxed,
    }
}

fn sample_one(
    module: &[GeneId],
    bins: &DegreeBinTable,
    rng: &mut dyn RngCore,
) -> (Vec<GeneId>, bool) {
    let mut chosen: HashSet<GeneId> = HashSet::with_capacity(module.len());
    let mut relaxed = false;

    for &gene in module {
        let home_bin = bins.bin_of(gene);
        let pick = draw_candidate(home_bin, bins, &chosen, rng).or_else(|| {
            for neighbour_bin in bins.neighboring_bins(home_bin) {
                relaxed = true;
                if let Some(candidate) = draw_candidate(neighbour_bin, bins, &chosen, rng) {
                    return Some(candidate);
                }
            }
            None
        });
        chosen.insert(pick.unwrap_or(gene));
    }

    (chosen.into_iter().collect(), relaxed)
}

fn draw_candidate(
    bin: usize,
    bins: &DegreeBinTable,
    exclude: &HashSet<GeneId>,
    rng: &mut dyn RngCore,
) -> Option<GeneId> {
    let candidates: Vec<GeneId> = bins
        .pool(bin)
        .iter()
        .copied()
        .filter(|gene| !exclude.contains(gene))
        .collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::task_rng;

    #[test]
    fn every_sample_has_module_sized_support() {
        let degrees: Vec<u32> = (0..40).collect();
        let bins = DegreeBinTable::build(&degrees, 5);
        let module = [GeneId::new(3), GeneId::new(10), GeneId::new(22)];
        let mut rng = task_rng(42, 0, 1, 2);
        let samples = sample(&module, 50, &bins, &mut rng);
        assert_eq!(samples.len(), 50);
        for drawn in samples.as_slice() {
            assert_eq!(drawn.len(), module.len());
        }
    }

    #[test]
    fn same_seed_yields_identical_samples() {
        let degrees: Vec<u32> = (0..40).collect();
        let bins = DegreeBinTable::build(&degrees, 5);
        let module = [GeneId::new(3), GeneId::new(10), GeneId::new(22)];

        let mut rng_a = task_rng(7, 1, 2, 3);
        let samples_a = sample(&module, 20, &bins, &mut rng_a);

        let mut rng_b = task_rng(7, 1, 2, 3);
        let samples_b = sample(&module, 20, &bins, &mut rng_b);

        let mut flat_a: Vec<GeneId> = samples_a.as_slice().iter().flatten().copied().collect();
        let mut flat_b: Vec<GeneId> = samples_b.as_slice().iter().flatten().copied().collect();
        flat_a.sort_unstable();
        flat_b.sort_unstable();
        assert_eq!(flat_a, flat_b);
    }
}
