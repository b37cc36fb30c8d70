//! Degree-bin table used by the null-model sampler.
//!
//! Vertices are partitioned into `n_bins` equal-count bands of the degree
//! distribution once when a graph loads; the null-model sampler then draws
//! replacement genes from the bin matching each module member's degree.

use crate::gene::GeneId;

/// A partition of the vertex set into equal-count degree bands.
#[derive(Clone, Debug)]
pub struct DegreeBinTable {
    /// Pool of vertices for each bin, in ascending-degree bin order.
    bins: Vec<Vec<GeneId>>,
    /// Bin index assigned to each vertex, indexed by `GeneId::get()`.
    bin_of: Vec<u32>,
}

impl DegreeBinTable {
    /// Builds a table with `n_bins` equal-count bands from `degrees`, where
    /// `degrees[i]` is the degree of the vertex with id `i`.
    ///
    /// Vertices are sorted by degree and split into `n_bins` contiguous
    /// bands of (as close to) equal size; the final band absorbs any
    /// remainder so every vertex is assigned exactly one bin.
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        reason = "order/bin_of are sized from degrees.len() and vertex indices are bounded by it"
    )]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bin count is clamped to n_bins, which fits u32 for any realistic graph"
    )]
    pub fn build(degrees: &[u32], n_bins: usize) -> Self {
        let n_bins = n_bins.max(1).min(degrees.len().max(1));
        let mut order: Vec<u32> = (0..u32::try_from(degrees.len()).unwrap_or(u32::MAX)).collect();
        order.sort_by_key(|&v| degrees[v as usize]);

        let mut bins: Vec<Vec<GeneId>> = vec![Vec::new(); n_bins];
        let mut bin_of = vec![0u32; degrees.len()];
        let total = order.len();
        for (rank, vertex) in order.into_iter().enumerate() {
            let bin = (rank * n_bins) / total.max(1);
            let bin = bin.min(n_bins - 1);
            bins[bin].push(GeneId::new(vertex));
            bin_of[vertex as usize] = bin as u32;
        }

        Self { bins, bin_of }
    }

    /// Returns the bin index of `gene`.
    #[must_use]
    pub fn bin_of(&self, gene: GeneId) -> usize {
        self.bin_of
            .get(gene.get() as usize)
            .copied()
            .unwrap_or(0) as usize
    }

    /// Returns the pool of vertices belonging to `bin`.
    #[must_use]
    pub fn pool(&self, bin: usize) -> &[GeneId] {
        self.bins.get(bin).map_or(&[], Vec::as_slice)
    }

    /// Returns the neighboring bins of `bin` in order of increasing
    /// distance, used to relax sampling when a pool is too small.
    #[must_use]
    pub fn neighboring_bins(&self, bin: usize) -> Vec<usize> {
        let n = self.bins.len();
        let mut order = Vec::with_capacity(n);
        for distance in 1..n {
            if bin >= distance {
                order.push(bin - distance);
            }
            if bin + distance < n {
                order.push(bin + distance);
            }
        }
        order
    }

    /// Returns the number of bins in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Returns `true` if the table has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_count_bands_cover_every_vertex() {
        let degrees: Vec<u32> = (0..20).collect();
        let table = DegreeBinTable::build(&degrees, 4);
        let total: usize = (0..table.len()).map(|b| table.pool(b).len()).sum();
        assert_eq!(total, 20);
        for bin in 0..table.len() {
            assert!(table.pool(bin).len() >= 4);
        }
    }

    #[test]
    fn bin_of_matches_pool_membership() {
        let degrees = vec![0, 5, 10, 15, 20, 25, 30, 35];
        let table = DegreeBinTable::build(&degrees, 2);
        for v in 0..degrees.len() as u32 {
            let gene = GeneId::new(v);
            let bin = table.bin_of(gene);
            assert!(table.pool(bin).contains(&gene));
        }
    }

    #[test]
    fn more_bins_than_vertices_clamps_to_one_per_vertex() {
        let degrees = vec![1, 2, 3];
        let table = DegreeBinTable::build(&degrees, 20);
        assert!(table.len() <= 3);
    }
}
