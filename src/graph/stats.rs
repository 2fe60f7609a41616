// src/graph/stats.rs
use serde::Serialize;

use crate::graph::overlap::OverlapGraph;
use crate::graph::partition::Component;
use crate::graph::traverser::LongestPath;

/// Shape of an overlap graph after component and path resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub singleton_components: usize,
    pub mean_component_size: f64,
    pub max_component_size: usize,
    /// Reads on the longest path of any component.
    pub longest_path_reads: usize,
    pub truncated_searches: usize,
}

impl GraphStats {
    pub fn compute(graph: &OverlapGraph<'_>, components: &[Component], paths: &[LongestPath]) -> Self {
        let sizes: Vec<usize> = components.iter().map(Component::len).collect();
        let mean_component_size = if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
        };

        GraphStats {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            components: components.len(),
            singleton_components: sizes.iter().filter(|&&s| s == 1).count(),
            mean_component_size,
            max_component_size: sizes.iter().max().copied().unwrap_or(0),
            longest_path_reads: paths.iter().map(|p| p.nodes.len()).max().unwrap_or(0),
            truncated_searches: paths.iter().filter(|p| p.truncated).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::overlap::Overlap;
    use crate::graph::partition::find_components;
    use crate::graph::traverser::longest_paths;

    #[test]
    fn test_graph_stats() {
        let reads: Vec<String> = (0..6).map(|_| "ACGT".to_string()).collect();
        let mut graph = OverlapGraph::new(&reads);
        for (from, to) in [(0, 1), (1, 2), (3, 4)] {
            graph.add_edge(from, to, Overlap { length: 2 });
        }
        let components = find_components(&graph);
        let paths = longest_paths(&graph, &components, 100);
        let stats = GraphStats::compute(&graph, &components, &paths);

        assert_eq!(stats.nodes, 6);
        assert_eq!(stats.edges, 3);
        assert_eq!(stats.components, 3);
        assert_eq!(stats.singleton_components, 1);
        assert_eq!(stats.max_component_size, 3);
        assert!((stats.mean_component_size - 2.0).abs() < 1e-9);
        assert_eq!(stats.longest_path_reads, 3);
        assert_eq!(stats.truncated_searches, 0);
    }

    #[test]
    fn test_empty_graph_stats() {
        let reads: Vec<String> = Vec::new();
        let graph = OverlapGraph::new(&reads);
        let stats = GraphStats::compute(&graph, &[], &[]);
        assert_eq!(stats.components, 0);
        assert_eq!(stats.mean_component_size, 0.0);
        assert_eq!(stats.longest_path_reads, 0);
    }
}
