//! Shared graph fixtures used across `netsyn` integration tests.

use netsyn_core::{EdgeTriple, GraphIndex};

/// A five-node path graph `A-B-C-D-E`.
#[must_use]
pub fn path_graph() -> GraphIndex {
    let edges = [
        EdgeTriple { gene_a: "A", gene_b: "B", source_tag: "fixture" },
        EdgeTriple { gene_a: "B", gene_b: "C", source_tag: "fixture" },
        EdgeTriple { gene_a: "C", gene_b: "D", source_tag: "fixture" },
        EdgeTriple { gene_a: "D", gene_b: "E", source_tag: "fixture" },
    ];
    GraphIndex::build(&edges, 1).0
}

/// The path graph from [`path_graph`] plus an isolated two-node component
/// `Z-Z2`, dropped at load time by the largest-component reduction.
#[must_use]
pub fn path_graph_with_isolated_vertex() -> GraphIndex {
    let edges = [
        EdgeTriple { gene_a: "A", gene_b: "B", source_tag: "fixture" },
        EdgeTriple { gene_a: "B", gene_b: "C", source_tag: "fixture" },
        EdgeTriple { gene_a: "C", gene_b: "D", source_tag: "fixture" },
        EdgeTriple { gene_a: "D", gene_b: "E", source_tag: "fixture" },
        EdgeTriple { gene_a: "Z", gene_b: "Z2", source_tag: "fixture" },
    ];
    GraphIndex::build(&edges, 1).0
}

/// Two triangles `{A1,A2,A3}` and `{B1,B2,B3}` joined by a single bridge
/// edge `(A1,B1)`.
#[must_use]
pub fn bridged_triangles() -> GraphIndex {
    let edges = [
        EdgeTriple { gene_a: "A1", gene_b: "A2", source_tag: "fixture" },
        EdgeTriple { gene_a: "A2", gene_b: "A3", source_tag: "fixture" },
        EdgeTriple { gene_a: "A1", gene_b: "A3", source_tag: "fixture" },
        EdgeTriple { gene_a: "B1", gene_b: "B2", source_tag: "fixture" },
        EdgeTriple { gene_a: "B2", gene_b: "B3", source_tag: "fixture" },
        EdgeTriple { gene_a: "B1", gene_b: "B3", source_tag: "fixture" },
        EdgeTriple { gene_a: "A1", gene_b: "B1", source_tag: "fixture" },
    ];
    GraphIndex::build(&edges, 1).0
}

/// Zachary's karate-club graph, used for the null-model z-score scenario.
/// The edge list is the standard 34-node, 78-edge dataset with vertices
/// named by their conventional numeric labels.
#[must_use]
#[expect(clippy::too_many_lines, reason = "verbatim edge list of a standard fixture dataset")]
pub fn karate_club_graph() -> GraphIndex {
    const RAW_EDGES: &[(u32, u32)] = &[
        (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8), (0, 10), (0, 11),
        (0, 12), (0, 13), (0, 17), (0, 19), (0, 21), (0, 31), (1, 2), (1, 3), (1, 7), (1, 13),
        (1, 17), (1, 19), (1, 21), (1, 30), (2, 3), (2, 7), (2, 8), (2, 9), (2, 13), (2, 27),
        (2, 28), (2, 32), (3, 7), (3, 12), (3, 13), (4, 6), (4, 10), (5, 6), (5, 10), (5, 16),
        (6, 16), (8, 30), (8, 32), (8, 33), (9, 33), (13, 33), (14, 32), (14, 33), (15, 32),
        (15, 33), (18, 32), (18, 33), (19, 33), (20, 32), (20, 33), (22, 32), (22, 33),
        (23, 25), (23, 27), (23, 29), (23, 32), (23, 33), (24, 25), (24, 27), (24, 31),
        (25, 31), (26, 29), (26, 33), (27, 33), (28, 31), (28, 33), (29, 32), (29, 33),
        (30, 32), (30, 33), (31, 32), (31, 33), (32, 33),
    ];
    let owned: Vec<(String, String)> = RAW_EDGES
        .iter()
        .map(|&(a, b)| (a.to_string(), b.to_string()))
        .collect();
    let edges: Vec<EdgeTriple<'_>> = owned
        .iter()
        .map(|(a, b)| EdgeTriple {
            gene_a: a.as_str(),
            gene_b: b.as_str(),
            source_tag: "karate",
        })
        .collect();
    GraphIndex::build(&edges, 5).0
}
