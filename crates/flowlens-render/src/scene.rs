//! Scene building: turns the graph plus the viewport transform into an
//! ordered draw list. Drawing order is fixed: edges, then nodes, then labels.

use flowlens_core::graph::{NodeKind, ProcessGraph};
use serde::Serialize;

/// Nodes whose duration/cost exceed these get a highlight ring, the visual
/// bottleneck signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighlightThresholds {
    pub duration: f64,
    pub cost: f64,
}

impl Default for HighlightThresholds {
    fn default() -> Self {
        Self {
            duration: 8.0,
            cost: 100.0,
        }
    }
}

/// One edge segment in screen space, trimmed to the node boundaries. The
/// arrowhead sits at `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneEdge {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub kind: NodeKind,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub edges: Vec<SceneEdge>,
    pub nodes: Vec<SceneNode>,
    pub labels: Vec<SceneLabel>,
}

pub fn build_scene(
    graph: &ProcessGraph,
    scale: f64,
    pan: (f64, f64),
    thresholds: &HighlightThresholds,
) -> Scene {
    let to_screen = |x: f64, y: f64| (x * scale + pan.0, y * scale + pan.1);

    let mut scene = Scene::default();
    for edge in graph.edges() {
        if !edge.visible || edge.is_self_loop() {
            continue;
        }
        let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target))
        else {
            continue;
        };
        if !source.visible || !target.visible {
            continue;
        }
        let (x1, y1) = to_screen(source.position.x, source.position.y);
        let (x2, y2) = to_screen(target.position.x, target.position.y);
        let (dx, dy) = (x2 - x1, y2 - y1);
        let dist = (dx * dx + dy * dy).sqrt();
        let trim = (source.radius + target.radius) * scale;
        if dist <= trim {
            // Overlapping endpoints leave no visible segment.
            continue;
        }
        let (ux, uy) = (dx / dist, dy / dist);
        scene.edges.push(SceneEdge {
            x1: x1 + ux * source.radius * scale,
            y1: y1 + uy * source.radius * scale,
            x2: x2 - ux * target.radius * scale,
            y2: y2 - uy * target.radius * scale,
        });
    }

    for node in graph.nodes() {
        if !node.visible {
            continue;
        }
        let (x, y) = to_screen(node.position.x, node.position.y);
        let radius = node.radius * scale;
        scene.nodes.push(SceneNode {
            id: node.id.clone(),
            x,
            y,
            radius,
            kind: node.kind,
            highlighted: exceeds_thresholds(node.metrics.as_ref(), thresholds),
        });
        scene.labels.push(SceneLabel {
            text: node.id.clone(),
            x,
            y: y - radius - 6.0,
        });
    }
    scene
}

fn exceeds_thresholds(
    metrics: Option<&flowlens_core::graph::NodeMetrics>,
    thresholds: &HighlightThresholds,
) -> bool {
    let Some(metrics) = metrics else {
        return false;
    };
    metrics.duration.is_some_and(|d| d > thresholds.duration)
        || metrics.cost.is_some_and(|c| c > thresholds.cost)
}
