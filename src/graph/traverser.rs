// src/graph/traverser.rs
use ahash::AHashMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::graph::overlap::OverlapGraph;
use crate::graph::partition::Component;

/// Longest cycle-free path found inside one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongestPath {
    pub nodes: Vec<usize>,
    pub paths_explored: usize,
    /// Enumeration stopped at the path limit before exhausting the component.
    pub truncated: bool,
}

struct Frame {
    node: usize,
    next_edge: usize,
    extended: bool,
}

/// Enumerate paths from every node of `component` with a backtracking DFS on an
/// explicit stack and keep the longest one (the first found on ties).
///
/// A path grows along outgoing edges until it reaches a dead end or every
/// successor is already on the path; at that point it is recorded.
/// `adjacency` holds the successor lists of the whole graph.
pub fn longest_path(adjacency: &[Vec<usize>], component: &Component, max_paths: usize) -> LongestPath {
    let local: AHashMap<usize, usize> = component
        .nodes
        .iter()
        .enumerate()
        .map(|(i, &node)| (node, i))
        .collect();
    let mut on_path = vec![false; component.len()];

    let mut best: Vec<usize> = Vec::new();
    let mut explored = 0usize;
    let mut truncated = false;

    'starts: for &start in &component.nodes {
        let mut path = vec![start];
        on_path[local[&start]] = true;
        let mut stack = vec![Frame { node: start, next_edge: 0, extended: false }];

        while let Some(frame) = stack.last_mut() {
            let successors = &adjacency[frame.node];
            let mut next = None;
            while frame.next_edge < successors.len() {
                let candidate = successors[frame.next_edge];
                frame.next_edge += 1;
                if let Some(&slot) = local.get(&candidate) {
                    if !on_path[slot] {
                        next = Some((candidate, slot));
                        break;
                    }
                }
            }

            match next {
                Some((node, slot)) => {
                    frame.extended = true;
                    on_path[slot] = true;
                    path.push(node);
                    stack.push(Frame { node, next_edge: 0, extended: false });
                }
                None => {
                    if !frame.extended {
                        explored += 1;
                        if path.len() > best.len() {
                            best = path.clone();
                        }
                    }
                    stack.pop();
                    if let Some(node) = path.pop() {
                        on_path[local[&node]] = false;
                    }

                    if best.len() == component.len() {
                        break 'starts;
                    }
                    if explored >= max_paths {
                        truncated = true;
                        break 'starts;
                    }
                }
            }
        }
    }

    if truncated {
        warn!(
            "Path search stopped after {} paths in a component of {} reads",
            explored,
            component.len()
        );
    }
    LongestPath { nodes: best, paths_explored: explored, truncated }
}

/// Longest path of every component, computed in parallel.
pub fn longest_paths(graph: &OverlapGraph<'_>, components: &[Component], max_paths: usize) -> Vec<LongestPath> {
    let adjacency = graph.adjacency();
    let paths: Vec<LongestPath> = components
        .par_iter()
        .map(|component| longest_path(&adjacency, component, max_paths))
        .collect();
    debug!("Resolved longest paths for {} components", paths.len());
    paths
}

/// Merge the reads along `path` into one sequence, skipping each edge's overlap.
pub fn spell_path(graph: &OverlapGraph<'_>, path: &[usize]) -> String {
    let Some(&first) = path.first() else {
        return String::new();
    };
    let mut sequence = graph.sequence(first).to_string();
    for pair in path.windows(2) {
        let next = graph.sequence(pair[1]);
        let overlap = graph.edge(pair[0], pair[1]).map_or(0, |o| o.length);
        sequence.push_str(&next[overlap.min(next.len())..]);
    }
    sequence
}
