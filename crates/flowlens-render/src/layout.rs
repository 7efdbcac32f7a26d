//! Whole-graph placement strategies.
//!
//! Layout is re-run from scratch whenever the active graph is replaced; nodes
//! are never repositioned incrementally when data changes.

use crate::{Result, Viewport};
use flowlens_core::graph::{Position, ProcessGraph};
use indexmap::IndexMap;
use serde::Serialize;

const MARGIN: f64 = 40.0;
const MIN_RADIUS: f64 = 8.0;
const MAX_RADIUS: f64 = 28.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStrategy {
    #[default]
    Grid,
    Circular,
}

impl std::str::FromStr for LayoutStrategy {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "circular" | "circle" => Ok(Self::Circular),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub position: Position,
    pub radius: f64,
}

/// Node placements in first-seen node order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphLayout {
    placements: IndexMap<String, Placement>,
}

impl GraphLayout {
    pub fn get(&self, id: &str) -> Option<&Placement> {
        self.placements.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Placement)> {
        self.placements.iter().map(|(id, p)| (id.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Assigns 2-D coordinates to every node.
pub fn layout(
    graph: &ProcessGraph,
    viewport: &Viewport,
    strategy: LayoutStrategy,
) -> Result<GraphLayout> {
    viewport.ensure_drawable()?;
    let placements = match strategy {
        LayoutStrategy::Grid => grid_placements(graph, viewport),
        LayoutStrategy::Circular => circular_placements(graph, viewport),
    };
    Ok(GraphLayout { placements })
}

/// Near-square grid: `ceil(sqrt(n))` columns, spacing derived from viewport
/// size divided by node count, then one uniform scale factor so the full grid
/// fits the viewport.
fn grid_placements(graph: &ProcessGraph, viewport: &Viewport) -> IndexMap<String, Placement> {
    let n = graph.node_count();
    let mut placements = IndexMap::with_capacity(n);
    if n == 0 {
        return placements;
    }

    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    let spacing = viewport.width.min(viewport.height) / n as f64;

    let extent_x = (cols.saturating_sub(1)) as f64 * spacing;
    let extent_y = (rows.saturating_sub(1)) as f64 * spacing;
    let scale_x = fit_scale(viewport.width - 2.0 * MARGIN, extent_x);
    let scale_y = fit_scale(viewport.height - 2.0 * MARGIN, extent_y);
    let scale = scale_x.min(scale_y);

    let origin_x = (viewport.width - extent_x * scale) / 2.0;
    let origin_y = (viewport.height - extent_y * scale) / 2.0;
    let radius = node_radius(spacing * scale);

    for (i, id) in graph.node_ids().enumerate() {
        let col = (i % cols) as f64;
        let row = (i / cols) as f64;
        placements.insert(
            id.to_string(),
            Placement {
                position: Position {
                    x: origin_x + col * spacing * scale,
                    y: origin_y + row * spacing * scale,
                },
                radius,
            },
        );
    }
    placements
}

/// Evenly spaced ring sized to the viewport, twelve o'clock first.
fn circular_placements(graph: &ProcessGraph, viewport: &Viewport) -> IndexMap<String, Placement> {
    let n = graph.node_count();
    let mut placements = IndexMap::with_capacity(n);
    if n == 0 {
        return placements;
    }

    let center_x = viewport.width / 2.0;
    let center_y = viewport.height / 2.0;
    let ring = (viewport.width.min(viewport.height) / 2.0 - MARGIN).max(1.0);
    let step = std::f64::consts::TAU / n as f64;
    let radius = node_radius(ring * step);

    for (i, id) in graph.node_ids().enumerate() {
        let angle = i as f64 * step;
        placements.insert(
            id.to_string(),
            Placement {
                position: Position {
                    x: center_x + ring * angle.sin(),
                    y: center_y - ring * angle.cos(),
                },
                radius,
            },
        );
    }
    placements
}

fn fit_scale(available: f64, extent: f64) -> f64 {
    if extent <= f64::EPSILON {
        1.0
    } else {
        (available / extent).max(f64::EPSILON)
    }
}

fn node_radius(spacing: f64) -> f64 {
    (spacing * 0.25).clamp(MIN_RADIUS, MAX_RADIUS)
}
