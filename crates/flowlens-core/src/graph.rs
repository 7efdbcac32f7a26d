//! Directed process graph extracted from an edge list.
//!
//! Nodes keep their first-seen order (the order downstream truncation and
//! tie-breaking rely on). Parallel edges between the same ordered pair are kept
//! as-is: multiplicity stands in for the observed frequency of a transition.

use indexmap::IndexMap;
use serde::Serialize;

/// Reserved id prefix that marks a node as a merge/consolidation point.
pub const MERGE_PREFIX: char = '=';

/// Default node radius before any layout pass assigns one.
pub const DEFAULT_NODE_RADIUS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Main,
    Sub,
}

impl NodeKind {
    /// Naming-convention heuristic: merge points and capitalized ids belong to
    /// the main process, everything else is a subprocess step.
    pub fn classify(id: &str) -> Self {
        match id.chars().next() {
            Some(c) if c == MERGE_PREFIX || c.is_ascii_uppercase() => Self::Main,
            _ => Self::Sub,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NodeMetrics {
    pub duration: Option<f64>,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub position: Position,
    pub radius: f64,
    pub visible: bool,
    pub metrics: Option<NodeMetrics>,
}

impl Node {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: NodeKind::classify(id),
            position: Position::default(),
            radius: DEFAULT_NODE_RADIUS,
            visible: true,
            metrics: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub visible: bool,
}

impl Edge {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Insertion-ordered node set plus edge list.
///
/// Every edge endpoint is guaranteed to be present in the node set: nodes are
/// only created through [`ProcessGraph::push_edge`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessGraph {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl ProcessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one observed transition, creating endpoints on first sight.
    pub fn push_edge(&mut self, source: &str, target: &str) {
        self.ensure_node(source);
        self.ensure_node(target);
        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
            visible: true,
        });
    }

    fn ensure_node(&mut self, id: &str) {
        if !self.nodes.contains_key(id) {
            self.nodes.insert(id.to_string(), Node::new(id));
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// First-seen position of a node, used as a deterministic tie-breaker.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() || self.edges.is_empty()
    }

    /// Records duration/cost observations against a node. Later observations
    /// overwrite earlier ones field-by-field.
    pub fn record_node_metrics(&mut self, id: &str, duration: Option<f64>, cost: Option<f64>) {
        if duration.is_none() && cost.is_none() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(id) {
            let metrics = node.metrics.get_or_insert_with(NodeMetrics::default);
            if duration.is_some() {
                metrics.duration = duration;
            }
            if cost.is_some() {
                metrics.cost = cost;
            }
        }
    }

    /// Ids of nodes adjacent to `id` (either edge direction), in edge order.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for edge in &self.edges {
            let other = if edge.source == id {
                edge.target.as_str()
            } else if edge.target == id {
                edge.source.as_str()
            } else {
                continue;
            };
            if other != id && !out.contains(&other) {
                out.push(other);
            }
        }
        out
    }

    /// Recomputes edge visibility from node visibility: an edge is visible iff
    /// both endpoints are.
    pub fn sync_edge_visibility(&mut self) {
        let hidden: Vec<&str> = self
            .nodes
            .values()
            .filter(|n| !n.visible)
            .map(|n| n.id.as_str())
            .collect();
        let hidden: rustc_hash::FxHashSet<&str> = hidden.into_iter().collect();
        for edge in &mut self.edges {
            edge.visible =
                !hidden.contains(edge.source.as_str()) && !hidden.contains(edge.target.as_str());
        }
    }
}
