// src/graph/partition.rs
use ahash::AHashSet;
use serde::Serialize;
use tracing::info;

use crate::graph::overlap::OverlapGraph;

/// A set of read ids connected through overlap edges. The first node is the
/// traversal root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub nodes: Vec<usize>,
}

impl Component {
    pub fn new(nodes: Vec<usize>) -> Self {
        Self { nodes }
    }

    pub fn root(&self) -> Option<usize> {
        self.nodes.first().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.nodes.contains(&id)
    }
}

/// Partition the graph into connected components with an iterative DFS.
///
/// Roots are taken in id order. From each node the walk follows outgoing edges
/// first, then incoming ones, so every node lands in exactly one component and
/// nodes claimed by an earlier component are never re-added.
pub fn find_components(graph: &OverlapGraph<'_>) -> Vec<Component> {
    let n = graph.node_count();
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        let mut nodes = vec![root];
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            let neighbors = graph
                .successors(node)
                .into_iter()
                .chain(graph.predecessors(node));
            for next in neighbors {
                if !visited[next] {
                    visited[next] = true;
                    nodes.push(next);
                    stack.push(next);
                }
            }
        }
        components.push(Component::new(nodes));
    }

    info!("Found {} connected components over {} reads", components.len(), n);
    components
}

/// Drop components that are subsumed by another one: a component whose root
/// appears inside a larger component, or an exact duplicate (same root, same
/// size) of an earlier one. Empty components are dropped as well.
///
/// Pairwise over the list, so quadratic in the number of components.
pub fn prune_components(components: Vec<Component>) -> Vec<Component> {
    let members: Vec<AHashSet<usize>> = components
        .iter()
        .map(|c| c.nodes.iter().copied().collect())
        .collect();

    let subsumed = |j: usize| -> bool {
        let Some(root) = components[j].root() else {
            return true;
        };
        let size = components[j].len();
        components.iter().enumerate().any(|(i, other)| {
            if i == j {
                return false;
            }
            if other.len() > size {
                members[i].contains(&root)
            } else {
                other.len() == size && other.root() == Some(root) && i < j
            }
        })
    };

    let keep: Vec<bool> = (0..components.len()).map(|j| !subsumed(j)).collect();
    let before = components.len();
    let pruned: Vec<Component> = components
        .into_iter()
        .zip(keep)
        .filter_map(|(c, keep)| keep.then_some(c))
        .collect();

    info!("Pruned components: {} -> {}", before, pruned.len());
    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::overlap::Overlap;

    fn graph_with_edges<'a>(reads: &'a [String], edges: &[(usize, usize)]) -> OverlapGraph<'a> {
        let mut graph = OverlapGraph::new(reads);
        for &(from, to) in edges {
            graph.add_edge(from, to, Overlap { length: 1 });
        }
        graph
    }

    fn placeholder_reads(n: usize) -> Vec<String> {
        (0..n).map(|_| "A".to_string()).collect()
    }

    #[test]
    fn test_components_cover_graph_disjointly() {
        let reads = placeholder_reads(7);
        // 0 -> 1, 2 -> 1, 5 -> 6, 4 -> 5, 3 isolated
        let graph = graph_with_edges(&reads, &[(0, 1), (2, 1), (5, 6), (4, 5)]);
        let components = find_components(&graph);

        let mut seen: Vec<usize> = components.iter().flat_map(|c| c.nodes.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..7).collect::<Vec<_>>());

        assert_eq!(components.len(), 3);
        let mut sizes: Vec<usize> = components.iter().map(|c| c.len()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 3, 3]);
    }

    #[test]
    fn test_cycles_terminate() {
        let reads = placeholder_reads(6);
        let graph = graph_with_edges(&reads, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        let components = find_components(&graph);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 6);
        assert_eq!(components[0].root(), Some(0));
    }

    #[test]
    fn test_pruning_removes_subsets_and_duplicates() {
        let components = vec![
            Component::new(vec![0, 1, 2, 3]),
            Component::new(vec![2, 3]),
            Component::new(vec![0, 1, 2, 3]),
            Component::new(vec![5]),
            Component::new(vec![]),
        ];
        let pruned = prune_components(components);
        assert_eq!(
            pruned,
            vec![Component::new(vec![0, 1, 2, 3]), Component::new(vec![5])]
        );
    }

    #[test]
    fn test_pruning_is_idempotent() {
        let components = vec![
            Component::new(vec![4, 5, 6]),
            Component::new(vec![5, 6]),
            Component::new(vec![6]),
            Component::new(vec![4, 5, 6]),
            Component::new(vec![7, 8]),
            Component::new(vec![8, 7]),
        ];
        let once = prune_components(components);
        let twice = prune_components(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_disjoint_components_survive_pruning() {
        let reads = placeholder_reads(5);
        let graph = graph_with_edges(&reads, &[(0, 1), (3, 4)]);
        let components = find_components(&graph);
        assert_eq!(prune_components(components.clone()), components);
    }
}
