//! Disease and drug module types.
//!
//! A module is a gene set (plus, for diseases, an optional signature)
//! already bound against a [`crate::graph::GraphIndex`] — genes absent from
//! the retained component are silently dropped at binding time, per §9 of
//! the design notes.

use std::collections::HashMap;

use crate::gene::GeneId;
use crate::graph::GraphIndex;

/// A disease gene module plus its optional transcriptional signature.
#[derive(Clone, Debug)]
pub struct DiseaseModule {
    name: String,
    genes: Vec<GeneId>,
    signature: HashMap<GeneId, f64>,
}

impl DiseaseModule {
    /// Binds a disease module from raw gene symbols against `graph`,
    /// dropping symbols outside the retained component.
    #[must_use]
    pub fn bind(graph: &GraphIndex, name: &str, symbols: &[String]) -> Self {
        let genes = bind_symbols(graph, symbols);
        Self {
            name: name.to_owned(),
            genes,
            signature: HashMap::new(),
        }
    }

    /// Attaches a signature, keeping only entries for genes present in
    /// `graph`. Genes with no entry remain absent, never treated as zero.
    pub fn with_signature(mut self, graph: &GraphIndex, signature: &HashMap<String, f64>) -> Self {
        self.signature = signature
            .iter()
            .filter_map(|(symbol, value)| graph.gene_id(symbol).map(|id| (id, *value)))
            .collect();
        self
    }

    /// Returns the module's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the module's genes, restricted to the retained component.
    #[must_use]
    pub fn genes(&self) -> &[GeneId] {
        &self.genes
    }

    /// Returns `true` if the module has no members in the retained
    /// component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns the signature value for `gene`, if present.
    #[must_use]
    pub fn signature_value(&self, gene: GeneId) -> Option<f64> {
        self.signature.get(&gene).copied()
    }

    /// Returns the full signature map.
    #[must_use]
    pub fn signature(&self) -> &HashMap<GeneId, f64> {
        &self.signature
    }
}

/// A drug's up- and down-regulated gene sets, drawn from the top/bottom
/// quantile of a differential-expression vector.
#[derive(Clone, Debug)]
pub struct DrugModule {
    name: String,
    up: Vec<GeneId>,
    down: Vec<GeneId>,
}

impl DrugModule {
    /// Binds a drug module from raw up/down gene symbols against `graph`.
    #[must_use]
    pub fn bind(graph: &GraphIndex, name: &str, up: &[String], down: &[String]) -> Self {
        Self {
            name: name.to_owned(),
            up: bind_symbols(graph, up),
            down: bind_symbols(graph, down),
        }
    }

    /// Returns the drug's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the up-regulated gene set.
    #[must_use]
    pub fn up(&self) -> &[GeneId] {
        &self.up
    }

    /// Returns the down-regulated gene set.
    #[must_use]
    pub fn down(&self) -> &[GeneId] {
        &self.down
    }

    /// Returns the unsigned footprint `up ∪ down`, used for topological
    /// scoring. Genes present in both sets (not disjoint-by-convention, but
    /// not guaranteed so) are counted once.
    #[must_use]
    pub fn footprint(&self) -> Vec<GeneId> {
        let mut footprint: Vec<GeneId> = self.up.iter().chain(self.down.iter()).copied().collect();
        footprint.sort_unstable();
        footprint.dedup();
        footprint
    }

    /// Returns `true` if the drug's footprint has no members in the
    /// retained component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }

    /// Returns the signed value of `gene` in this drug's footprint: `+1`
    /// if up-regulated, `-1` if down-regulated, `None` otherwise.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "signed membership is expressed as +/-1.0 for correlation against real signatures"
    )]
    pub fn signed_value(&self, gene: GeneId) -> Option<f64> {
        if self.up.contains(&gene) {
            Some(1.0)
        } else if self.down.contains(&gene) {
            Some(-1.0)
        } else {
            None
        }
    }
}

fn bind_symbols(graph: &GraphIndex, symbols: &[String]) -> Vec<GeneId> {
    let mut genes: Vec<GeneId> = symbols
        .iter()
        .filter_map(|symbol| graph.gene_id(symbol))
        .collect();
    genes.sort_unstable();
    genes.dedup();
    genes
}
