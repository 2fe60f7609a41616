// src/graph/overlap.rs
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{AssemblyConfig, GraphStrategy};
use crate::error::{AssemblyError, Result};
use crate::index::{IndexSide, OverlapIndex};
use crate::io::fasta::validate_alphabet;
use crate::kmer::{count_shared_between, frequency_map, KmerCounts, SimilarityOracle};

/// Edge payload: the source's last `length` symbols overlap the target's first `length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub length: usize,
}

impl Overlap {
    /// The overlapping substring as it appears at the end of `source`.
    pub fn spell<'a>(&self, source: &'a str) -> &'a str {
        &source[source.len().saturating_sub(self.length)..]
    }
}

/// Directed read-overlap graph. Node `i` is read `i`; the sequences are
/// borrowed from the read collection and never copied.
#[derive(Debug, Clone)]
pub struct OverlapGraph<'r> {
    reads: &'r [String],
    graph: DiGraph<usize, Overlap>,
}

impl<'r> OverlapGraph<'r> {
    /// Graph with one node per read and no edges.
    pub fn new(reads: &'r [String]) -> Self {
        let mut graph = DiGraph::with_capacity(reads.len(), reads.len());
        for id in 0..reads.len() {
            graph.add_node(id);
        }
        Self { reads, graph }
    }

    /// Build with the strategy selected in `config`.
    pub fn build(reads: &'r [String], config: &AssemblyConfig) -> Result<Self> {
        if reads.is_empty() {
            return Err(AssemblyError::EmptyInput);
        }
        config.validate()?;

        match config.graph_strategy {
            GraphStrategy::AllPairs => {
                let mut oracle = SimilarityOracle::from_config(config);
                Self::build_all_pairs(reads, config.min_match_length, config.graph_confidence, &mut oracle)
            }
            GraphStrategy::Indexed => Self::build_indexed(reads, config.min_match_length),
        }
    }

    /// Compare every read's trailing window with every other read's leading
    /// window through the oracle. An edge is skipped when its reverse exists.
    pub fn build_all_pairs(
        reads: &'r [String],
        min_match_length: usize,
        confidence: f64,
        oracle: &mut SimilarityOracle,
    ) -> Result<Self> {
        check_lengths(reads, min_match_length)?;
        let m = min_match_length;
        let k = oracle.k();

        // Warm the cache so every worker shares one baseline.
        oracle.expected_shared(m);
        let base: &SimilarityOracle = oracle;

        let prefix_counts: Vec<KmerCounts<'r>> = reads
            .par_iter()
            .map(|read| frequency_map(&read[..m], k))
            .collect();

        let candidates: Vec<Vec<usize>> = (0..reads.len())
            .into_par_iter()
            .map(|i| {
                let mut worker = base.fork(i as u64);
                let read = &reads[i];
                let suffix_counts = frequency_map(&read[read.len() - m..], k);
                (0..reads.len())
                    .filter(|&j| {
                        j != i && {
                            let shared = count_shared_between(&suffix_counts, &prefix_counts[j]);
                            worker.accepts_shared(shared, m, confidence)
                        }
                    })
                    .collect()
            })
            .collect();

        let mut graph = Self::new(reads);
        for (i, targets) in candidates.into_iter().enumerate() {
            for j in targets {
                if !graph.has_edge(j, i) {
                    graph.add_edge(i, j, Overlap { length: m });
                }
            }
        }

        info!(
            "All-pairs overlap graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Link reads whose `min_match_length` suffix equals another read's prefix
    /// of the same length. Candidates are accepted without oracle checks.
    pub fn build_indexed(reads: &'r [String], min_match_length: usize) -> Result<Self> {
        let prefix_index = OverlapIndex::build_prefix(reads, min_match_length)?;
        let suffix_index = OverlapIndex::build_suffix(reads, min_match_length)?;
        let overlap = Overlap { length: min_match_length };

        let mut graph = Self::new(reads);
        for (id, read) in reads.iter().enumerate() {
            let suffix = IndexSide::Suffix.key_of(read, min_match_length);
            for &target in prefix_index.lookup(suffix) {
                graph.add_edge(id, target, overlap);
            }
            let prefix = IndexSide::Prefix.key_of(read, min_match_length);
            for &source in suffix_index.lookup(prefix) {
                graph.add_edge(source, id, overlap);
            }
        }

        info!(
            "Indexed overlap graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Add `from -> to`. Self-edges and repeated ordered pairs are ignored.
    pub fn add_edge(&mut self, from: usize, to: usize, overlap: Overlap) -> bool {
        if from == to || self.has_edge(from, to) {
            return false;
        }
        debug!("Edge {} -> {} ({} symbols)", from, to, overlap.length);
        self.graph
            .add_edge(NodeIndex::new(from), NodeIndex::new(to), overlap);
        true
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.graph
            .find_edge(NodeIndex::new(from), NodeIndex::new(to))
            .is_some()
    }

    pub fn edge(&self, from: usize, to: usize) -> Option<Overlap> {
        self.graph
            .find_edge(NodeIndex::new(from), NodeIndex::new(to))
            .map(|e| self.graph[e])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn reads(&self) -> &'r [String] {
        self.reads
    }

    pub fn sequence(&self, id: usize) -> &'r str {
        &self.reads[id]
    }

    /// Outgoing neighbours of `id`, ascending.
    pub fn successors(&self, id: usize) -> Vec<usize> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Incoming neighbours of `id`, ascending.
    pub fn predecessors(&self, id: usize) -> Vec<usize> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: usize, dir: Direction) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(id), dir)
            .map(|n| n.index())
            .collect();
        out.sort_unstable();
        out
    }

    /// Every edge as `(source, target, overlap)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, Overlap)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
    }

    /// Successor lists for every node, for traversals that run many times.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        (0..self.node_count()).map(|id| self.successors(id)).collect()
    }
}

fn check_lengths(reads: &[String], required: usize) -> Result<()> {
    validate_alphabet(reads)?;
    match reads.iter().position(|r| r.len() < required) {
        Some(read_id) => Err(AssemblyError::InputTooShort {
            read_id,
            length: reads[read_id].len(),
            required,
        }),
        None => Ok(()),
    }
}
