//! Bounded start-to-end path discovery.
//!
//! This is a heuristic enumerator, not a formal process miner: the node set is
//! hard-truncated, one path is kept per (start, end) pair, and enumeration
//! stops outright at the path cap. Known precision/performance tradeoff.

use crate::graph::ProcessGraph;
use rustc_hash::{FxHashMap, FxHashSet};

/// One start-to-end traversal. Never repeats a node.
pub type ProcessPath = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLimits {
    /// Hard cap on the working node set (truncated in first-seen order).
    pub max_nodes: usize,
    /// Hard cap on the total number of enumerated paths.
    pub max_paths: usize,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            max_nodes: 100,
            max_paths: 50,
        }
    }
}

/// Enumerates one path per (start, end) pair under `limits`.
///
/// Starts are nodes without incoming edges and ends are nodes without outgoing
/// edges, computed over the truncated edge set. A fully cyclic graph has no
/// starts and yields an empty list; downstream metrics degrade to zero.
pub fn find_all_paths(graph: &ProcessGraph, limits: &PathLimits) -> Vec<ProcessPath> {
    let working: Vec<&str> = graph.node_ids().take(limits.max_nodes).collect();
    if working.len() < graph.node_count() {
        tracing::debug!(
            kept = working.len(),
            total = graph.node_count(),
            "truncated node set for path discovery"
        );
    }
    let kept: FxHashSet<&str> = working.iter().copied().collect();

    // Adjacency in edge insertion order; the first path found per pair follows
    // that order. Self-loops stay in the degree counts (a node only fed by
    // itself is not a start) but can never extend a path.
    let mut adjacency: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    let mut has_incoming: FxHashSet<&str> = FxHashSet::default();
    let mut has_outgoing: FxHashSet<&str> = FxHashSet::default();
    for edge in graph.edges() {
        let (source, target) = (edge.source.as_str(), edge.target.as_str());
        if !kept.contains(source) || !kept.contains(target) {
            continue;
        }
        adjacency.entry(source).or_default().push(target);
        has_outgoing.insert(source);
        has_incoming.insert(target);
    }

    let starts: Vec<&str> = working
        .iter()
        .copied()
        .filter(|id| !has_incoming.contains(id))
        .collect();
    let ends: Vec<&str> = working
        .iter()
        .copied()
        .filter(|id| !has_outgoing.contains(id))
        .collect();

    let mut paths: Vec<ProcessPath> = Vec::new();
    'outer: for &start in &starts {
        for &end in &ends {
            if paths.len() >= limits.max_paths {
                break 'outer;
            }
            let mut visited: FxHashSet<&str> = FxHashSet::default();
            let mut trail: Vec<&str> = Vec::new();
            if dfs(start, end, &adjacency, &mut visited, &mut trail) {
                paths.push(trail.into_iter().map(str::to_string).collect());
            }
        }
    }
    paths
}

fn dfs<'g>(
    current: &'g str,
    end: &str,
    adjacency: &FxHashMap<&'g str, Vec<&'g str>>,
    visited: &mut FxHashSet<&'g str>,
    trail: &mut Vec<&'g str>,
) -> bool {
    trail.push(current);
    if current == end {
        return true;
    }
    visited.insert(current);
    if let Some(nexts) = adjacency.get(current) {
        for &next in nexts {
            if visited.contains(next) {
                continue;
            }
            if dfs(next, end, adjacency, visited, trail) {
                return true;
            }
        }
    }
    visited.remove(current);
    trail.pop();
    false
}
