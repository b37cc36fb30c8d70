//! Integer-indexed, compressed-sparse-row graph index.
//!
//! Vertices are the largest connected component of the input edge list;
//! everything outside it is dropped at load time and reported as a
//! diagnostic, never an error — a disease or drug module that references a
//! dropped gene simply loses that member at module-binding time.

#![expect(
    clippy::indexing_slicing,
    reason = "CSR offsets/targets and the union-find parent vector are sized from \
              vertex_count and indexed only by ids already checked against it"
)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::degree_bins::DegreeBinTable;
use crate::gene::{GeneId, GeneInterner};

/// Stand-in distance used when no path connects two vertices, or when a set
/// has no member in the retained component. Matches the paper's choice of
/// an implausibly large but finite value so downstream arithmetic (z-scores,
/// separation) stays well-defined without special-casing infinities.
pub const SENTINEL_DISTANCE: f64 = 1000.0;

/// An unweighted, undirected, simple graph with compressed-sparse-row
/// adjacency and a precomputed degree-bin table.
#[derive(Clone, Debug)]
pub struct GraphIndex {
    interner: GeneInterner,
    offsets: Vec<u32>,
    targets: Vec<u32>,
    degree_bins: DegreeBinTable,
    dropped_vertex_count: usize,
    /// Provenance source tags accumulated per undirected edge, keyed by the
    /// ordered pair of retained vertex ids. Observability only; no scoring
    /// operation reads this map.
    provenance: HashMap<(u32, u32), Arc<[Arc<str>]>>,
}

/// One raw input edge: an undirected gene pair plus a provenance tag.
pub struct EdgeTriple<'a> {
    pub gene_a: &'a str,
    pub gene_b: &'a str,
    pub source_tag: &'a str,
}

impl GraphIndex {
    /// Builds a [`GraphIndex`] from raw edge triples.
    ///
    /// Self-loops are dropped, parallel edges are deduplicated, and only
    /// the largest connected component is retained. `n_bins` controls the
    /// granularity of the degree-bin table used by the null-model sampler.
    ///
    /// Returns the index alongside the number of vertices dropped because
    /// they fell outside the largest component.
    #[must_use]
    pub fn build(edges: &[EdgeTriple<'_>], n_bins: usize) -> (Self, usize) {
        let mut interner = GeneInterner::new();
        let mut adjacency: HashMap<u32, HashSet<u32>> = HashMap::new();
        let mut raw_provenance: HashMap<(u32, u32), Vec<String>> = HashMap::new();

        for edge in edges {
            let a = interner.intern(edge.gene_a).get();
            let b = interner.intern(edge.gene_b).get();
            if a == b {
                continue;
            }
            adjacency.entry(a).or_default().insert(b);
            adjacency.entry(b).or_default().insert(a);
            if !edge.source_tag.is_empty() {
                let key = if a < b { (a, b) } else { (b, a) };
                let tags = raw_provenance.entry(key).or_default();
                if !tags.iter().any(|tag| tag == edge.source_tag) {
                    tags.push(edge.source_tag.to_owned());
                }
            }
        }

        let vertex_count = interner.len();
        let components = connected_components(vertex_count, &adjacency);
        let largest = largest_component(&components);

        let retained: Vec<u32> = (0..vertex_count as u32)
            .filter(|&v| components.get(v as usize).copied() == Some(largest))
            .collect();
        let dropped_vertex_count = vertex_count - retained.len();

        let mut remap: HashMap<u32, u32> = HashMap::with_capacity(retained.len());
        let mut new_interner = GeneInterner::new();
        for (new_id, &old_id) in retained.iter().enumerate() {
            remap.insert(old_id, u32::try_from(new_id).unwrap_or(u32::MAX));
        }
        for &old_id in &retained {
            if let Some(symbol) = interner.symbol(GeneId::new(old_id)) {
                new_interner.intern(symbol);
            }
        }

        let mut offsets = vec![0u32; retained.len() + 1];
        let mut degrees = vec![0u32; retained.len()];
        let mut neighbour_lists: Vec<Vec<u32>> = vec![Vec::new(); retained.len()];
        for &old_id in &retained {
            let new_id = remap[&old_id];
            let mut neighbours: Vec<u32> = adjacency
                .get(&old_id)
                .into_iter()
                .flatten()
                .filter_map(|old_neighbour| remap.get(old_neighbour).copied())
                .collect();
            neighbours.sort_unstable();
            neighbours.dedup();
            degrees[new_id as usize] = u32::try_from(neighbours.len()).unwrap_or(u32::MAX);
            neighbour_lists[new_id as usize] = neighbours;
        }
        for (index, list) in neighbour_lists.iter().enumerate() {
            offsets[index + 1] = offsets[index] + u32::try_from(list.len()).unwrap_or(u32::MAX);
        }
        let targets: Vec<u32> = neighbour_lists.into_iter().flatten().collect();

        let mut provenance: HashMap<(u32, u32), Arc<[Arc<str>]>> =
            HashMap::with_capacity(raw_provenance.len());
        for ((old_a, old_b), tags) in raw_provenance {
            if let (Some(&new_a), Some(&new_b)) = (remap.get(&old_a), remap.get(&old_b)) {
                let key = if new_a < new_b { (new_a, new_b) } else { (new_b, new_a) };
                let arc_tags: Arc<[Arc<str>]> =
                    tags.into_iter().map(Arc::from).collect::<Vec<_>>().into();
                provenance.insert(key, arc_tags);
            }
        }

        let degree_bins = DegreeBinTable::build(&degrees, n_bins);

        if dropped_vertex_count > 0 {
            tracing::warn!(
                dropped_vertex_count,
                retained_vertex_count = retained.len(),
                "dropped vertices outside the largest connected component"
            );
        }

        (
            Self {
                interner: new_interner,
                offsets,
                targets,
                degree_bins,
                dropped_vertex_count,
                provenance,
            },
            dropped_vertex_count,
        )
    }

    /// Returns the provenance source tags recorded for the edge between `a`
    /// and `b`, if any, in first-seen order with duplicates removed.
    /// Observability only; no scoring computation depends on this value.
    #[must_use]
    pub fn edge_sources(&self, a: GeneId, b: GeneId) -> &[Arc<str>] {
        let (x, y) = (a.get(), b.get());
        let key = if x < y { (x, y) } else { (y, x) };
        self.provenance.get(&key).map_or(&[][..], AsRef::as_ref)
    }

    /// Returns the number of retained vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Returns `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Returns the number of vertices dropped during the largest-component
    /// reduction at load time.
    #[must_use]
    pub fn dropped_vertex_count(&self) -> usize {
        self.dropped_vertex_count
    }

    /// Looks up the [`GeneId`] for a gene symbol, if it lies in the
    /// retained component.
    #[must_use]
    pub fn gene_id(&self, symbol: &str) -> Option<GeneId> {
        self.interner.get(symbol)
    }

    /// Returns the symbol a [`GeneId`] was interned from.
    #[must_use]
    pub fn symbol(&self, id: GeneId) -> Option<&str> {
        self.interner.symbol(id)
    }

    /// Returns `true` if `id` refers to a vertex in the retained component.
    #[must_use]
    pub fn contains(&self, id: GeneId) -> bool {
        (id.get() as usize) < self.vertex_count()
    }

    /// Returns the degree-bin table built alongside this graph.
    #[must_use]
    pub fn degree_bins(&self) -> &DegreeBinTable {
        &self.degree_bins
    }

    /// Returns the neighbours of `id` in ascending order.
    #[must_use]
    pub fn neighbours(&self, id: GeneId) -> &[u32] {
        if !self.contains(id) {
            return &[];
        }
        let index = id.get() as usize;
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        &self.targets[start..end]
    }

    /// Runs an unweighted BFS from `source`, returning the distance to
    /// every reachable vertex. Unreachable vertices are `u32::MAX`.
    #[must_use]
    pub fn bfs_distances(&self, source: GeneId) -> Vec<u32> {
        let mut distances = vec![u32::MAX; self.vertex_count()];
        if !self.contains(source) {
            return distances;
        }
        let mut queue = VecDeque::new();
        distances[source.get() as usize] = 0;
        queue.push_back(source.get());
        while let Some(current) = queue.pop_front() {
            let current_distance = distances[current as usize];
            for &neighbour in self.neighbours(GeneId::new(current)) {
                if distances[neighbour as usize] == u32::MAX {
                    distances[neighbour as usize] = current_distance + 1;
                    queue.push_back(neighbour);
                }
            }
        }
        distances
    }

    /// Returns every retained edge as `(gene_a, gene_b, source_tag)`, each
    /// undirected pair listed once, with provenance tags joined by `;` the
    /// way the edge-list CSV format expects.
    #[must_use]
    pub fn edges(&self) -> Vec<(String, String, String)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for a in 0..u32::try_from(self.vertex_count()).unwrap_or(u32::MAX) {
            for &b in self.neighbours(GeneId::new(a)) {
                let key = if a < b { (a, b) } else { (b, a) };
                if !seen.insert(key) {
                    continue;
                }
                let gene_a = self.symbol(GeneId::new(key.0)).unwrap_or("").to_owned();
                let gene_b = self.symbol(GeneId::new(key.1)).unwrap_or("").to_owned();
                let source_tag = self
                    .edge_sources(GeneId::new(key.0), GeneId::new(key.1))
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<&str>>()
                    .join(";");
                edges.push((gene_a, gene_b, source_tag));
            }
        }
        edges
    }

    /// Computes `dist_set_to_set(s, t)` without reusing a [`DistanceCache`].
    ///
    /// Prefer [`DistanceCache::dist_set_to_set`] when the same source set is
    /// evaluated against many target sets in one batch.
    #[must_use]
    pub fn dist_set_to_set(&self, sources: &[GeneId], targets: &[GeneId]) -> f64 {
        let mut cache = DistanceCache::new(self);
        cache.dist_set_to_set(sources, targets)
    }
}

fn connected_components(vertex_count: usize, adjacency: &HashMap<u32, HashSet<u32>>) -> Vec<u32> {
    let mut uf = UnionFind::new(vertex_count);
    for (&a, neighbours) in adjacency {
        for &b in neighbours {
            uf.union(a, b);
        }
    }
    (0..vertex_count as u32).map(|v| uf.find(v)).collect()
}

fn largest_component(components: &[u32]) -> u32 {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for &root in components {
        *counts.entry(root).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map_or(0, |(root, _)| root)
}

/// Serial path-halving union-find, used once at load time to extract
/// connected components. No concurrency needed here: unlike a parallel
/// minimum-spanning-tree build, component extraction runs a single pass
/// before any worker threads exist.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
        }
    }

    fn find(&mut self, mut node: u32) -> u32 {
        while self.parent[node as usize] != node {
            let grandparent = self.parent[self.parent[node as usize] as usize];
            self.parent[node as usize] = grandparent;
            node = grandparent;
        }
        node
    }

    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_a as usize] = root_b;
        }
    }
}

/// Caches BFS distance vectors keyed by source vertex across a batch of
/// `dist_set_to_set` queries sharing the same source set, so the inner loop
/// of drug-pair scoring (one disease module against many drug modules)
/// pays for each source's BFS once per batch rather than once per query.
pub struct DistanceCache<'g> {
    graph: &'g GraphIndex,
    cache: HashMap<GeneId, Vec<u32>>,
}

impl<'g> DistanceCache<'g> {
    /// Creates an empty cache bound to `graph`.
    #[must_use]
    pub fn new(graph: &'g GraphIndex) -> Self {
        Self {
            graph,
            cache: HashMap::new(),
        }
    }

    fn distances_from(&mut self, source: GeneId) -> &Vec<u32> {
        if self.cache.contains_key(&source) {
            self.record_hit();
        } else {
            self.record_miss();
        }
        self.cache
            .entry(source)
            .or_insert_with(|| self.graph.bfs_distances(source))
    }

    #[cfg(feature = "metrics")]
    fn record_hit(&self) {
        metrics::counter!("netsyn_distance_cache_hits").increment(1);
    }

    #[cfg(not(feature = "metrics"))]
    fn record_hit(&self) {}

    #[cfg(feature = "metrics")]
    fn record_miss(&self) {
        metrics::counter!("netsyn_distance_cache_misses").increment(1);
    }

    #[cfg(not(feature = "metrics"))]
    fn record_miss(&self) {}

    /// Computes `(1/|S|) * sum_{s in S} min_{t in T} d(s,t)`, reusing cached
    /// BFS distance vectors for sources seen earlier in this batch.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "averaging a real-valued distance metric over a gene set"
    )]
    pub fn dist_set_to_set(&mut self, sources: &[GeneId], targets: &[GeneId]) -> f64 {
        if sources.is_empty() || targets.is_empty() {
            return SENTINEL_DISTANCE;
        }
        let mut total = 0.0;
        for &source in sources {
            let distances = self.distances_from(source);
            let min_distance = targets
                .iter()
                .filter_map(|target| distances.get(target.get() as usize).copied())
                .filter(|&d| d != u32::MAX)
                .min();
            total += min_distance.map_or(SENTINEL_DISTANCE, f64::from);
        }
        total / sources.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge<'a>(a: &'a str, b: &'a str) -> EdgeTriple<'a> {
        EdgeTriple {
            gene_a: a,
            gene_b: b,
            source_tag: "test",
        }
    }

    #[test]
    fn path_graph_distance_matches_scenario_s1() {
        let edges = [
            edge("A", "B"),
            edge("B", "C"),
            edge("C", "D"),
            edge("D", "E"),
        ];
        let (graph, dropped) = GraphIndex::build(&edges, 2);
        assert_eq!(dropped, 0);

        let q = graph.gene_id("A").expect("A interned");
        let m = graph.gene_id("E").expect("E interned");

        let d_qm = graph.dist_set_to_set(&[q], &[m]);
        let d_mq = graph.dist_set_to_set(&[m], &[q]);
        assert!((d_qm - 4.0).abs() < f64::EPSILON);
        assert!((d_mq - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn self_distance_is_zero() {
        let edges = [edge("A", "B"), edge("B", "C")];
        let (graph, _) = GraphIndex::build(&edges, 1);
        let a = graph.gene_id("A").expect("A interned");
        let b = graph.gene_id("B").expect("B interned");
        let set = [a, b];
        assert!(graph.dist_set_to_set(&set, &set).abs() < f64::EPSILON);
    }

    #[test]
    fn disconnected_vertex_returns_sentinel() {
        let edges = [
            edge("A", "B"),
            edge("B", "C"),
            edge("C", "D"),
            edge("D", "E"),
            edge("Z", "Z2"),
        ];
        let (graph, dropped) = GraphIndex::build(&edges, 1);
        assert!(dropped > 0);
        assert!(graph.gene_id("Z").is_none());
    }

    #[test]
    fn largest_component_is_retained() {
        let edges = [
            edge("A", "B"),
            edge("B", "C"),
            edge("C", "D"),
            edge("D", "E"),
            edge("X", "Y"),
        ];
        let (graph, dropped) = GraphIndex::build(&edges, 1);
        assert_eq!(dropped, 2);
        assert_eq!(graph.vertex_count(), 5);
    }

    #[test]
    fn edges_lists_each_undirected_pair_once_with_joined_sources() {
        let edges = [
            EdgeTriple { gene_a: "A", gene_b: "B", source_tag: "biogrid" },
            EdgeTriple { gene_a: "B", gene_b: "A", source_tag: "string" },
        ];
        let (graph, _) = GraphIndex::build(&edges, 1);
        let listed = graph.edges();
        assert_eq!(listed.len(), 1);
        let (gene_a, gene_b, source_tag) = &listed[0];
        assert_eq!((gene_a.as_str(), gene_b.as_str()), ("A", "B"));
        assert!(source_tag == "biogrid;string" || source_tag == "string;biogrid");
    }

    #[test]
    fn provenance_accumulates_distinct_sources_per_edge() {
        let edges = [
            EdgeTriple { gene_a: "A", gene_b: "B", source_tag: "biogrid" },
            EdgeTriple { gene_a: "B", gene_b: "A", source_tag: "string" },
            EdgeTriple { gene_a: "A", gene_b: "B", source_tag: "biogrid" },
        ];
        let (graph, _) = GraphIndex::build(&edges, 1);
        let a = graph.gene_id("A").expect("A interned");
        let b = graph.gene_id("B").expect("B interned");
        let sources = graph.edge_sources(a, b);
        assert_eq!(sources.len(), 2);
        assert!(sources.iter().any(|tag| &**tag == "biogrid"));
        assert!(sources.iter().any(|tag| &**tag == "string"));
        assert_eq!(graph.edge_sources(b, a).len(), 2);
    }
}
