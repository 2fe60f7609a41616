use std::time::Instant;

use tracing::info;

use crate::config::AssemblyConfig;
use crate::error::{AssemblyError, Result};
use crate::graph::assembler::Contig;
use crate::graph::overlap::OverlapGraph;
use crate::graph::partition::{find_components, prune_components, Component};
use crate::graph::stats::GraphStats;
use crate::graph::traverser::{longest_paths, spell_path, LongestPath};

/// Everything the overlap-graph pipeline produces. `longest_paths[i]` belongs
/// to `components[i]`.
#[derive(Debug)]
pub struct GraphAssembly<'r> {
    pub graph: OverlapGraph<'r>,
    pub components: Vec<Component>,
    pub longest_paths: Vec<LongestPath>,
    /// Spelled longest paths of at least `min_contig_length` symbols.
    pub contigs: Vec<Contig>,
}

impl GraphAssembly<'_> {
    pub fn stats(&self) -> GraphStats {
        GraphStats::compute(&self.graph, &self.components, &self.longest_paths)
    }
}

/// Build the overlap graph, split it into components and spell each
/// component's longest path.
pub fn assemble_graph<'r>(reads: &'r [String], config: &AssemblyConfig) -> Result<GraphAssembly<'r>> {
    if reads.is_empty() {
        return Err(AssemblyError::EmptyInput);
    }
    config.validate()?;

    let start = Instant::now();
    info!(
        "Building {:?} overlap graph over {} reads",
        config.graph_strategy,
        reads.len()
    );
    let graph = OverlapGraph::build(reads, config)?;

    let components = prune_components(find_components(&graph));
    let paths = longest_paths(&graph, &components, config.max_paths_per_component);

    let contigs: Vec<Contig> = paths
        .iter()
        .map(|path| (spell_path(&graph, &path.nodes), path))
        .filter(|(sequence, _)| sequence.len() >= config.min_contig_length)
        .enumerate()
        .map(|(id, (sequence, path))| Contig {
            id,
            sequence,
            read_path: path.nodes.clone(),
        })
        .collect();

    info!(
        "Graph assembly finished in {:.2}s: {} components, {} contigs",
        start.elapsed().as_secs_f32(),
        components.len(),
        contigs.len()
    );

    Ok(GraphAssembly {
        graph,
        components,
        longest_paths: paths,
        contigs,
    })
}
