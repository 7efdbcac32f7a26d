//! Viewport interaction state.
//!
//! One controller owns the visible graph, the pan/zoom transform, and the
//! redraw gate; there is no ambient rendering state anywhere else. All
//! mutation happens on the UI thread that owns the controller.

use crate::layout::GraphLayout;
use crate::scene::{self, HighlightThresholds, Scene};
use crate::{Result, Viewport};
use flowlens_core::graph::{NodeKind, ProcessGraph};
use std::time::{Duration, Instant};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 5.0;
pub const ZOOM_IN_FACTOR: f64 = 1.2;
pub const ZOOM_OUT_FACTOR: f64 = 0.8;

/// At most one frame per interval (60 Hz target).
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Idle,
    DraggingNode {
        node_id: String,
        grab_dx: f64,
        grab_dy: f64,
    },
    Panning {
        last_x: f64,
        last_y: f64,
    },
}

pub struct ViewportController {
    viewport: Viewport,
    graph: ProcessGraph,
    scale: f64,
    pan_x: f64,
    pan_y: f64,
    interaction: Interaction,
    thresholds: HighlightThresholds,
    needs_redraw: bool,
    last_draw: Option<Instant>,
}

impl ViewportController {
    /// Takes ownership of the graph for the lifetime of this dataset and
    /// applies the layout's placements to it.
    pub fn new(mut graph: ProcessGraph, layout: &GraphLayout, viewport: Viewport) -> Result<Self> {
        viewport.ensure_drawable()?;
        apply_layout(&mut graph, layout);
        Ok(Self {
            viewport,
            graph,
            scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            interaction: Interaction::Idle,
            thresholds: HighlightThresholds::default(),
            needs_redraw: true,
            last_draw: None,
        })
    }

    pub fn with_thresholds(mut self, thresholds: HighlightThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Swaps in a freshly parsed graph and its layout, discarding the old one
    /// wholesale. The view transform resets; nothing carries over.
    pub fn replace_graph(&mut self, mut graph: ProcessGraph, layout: &GraphLayout) {
        apply_layout(&mut graph, layout);
        self.graph = graph;
        self.reset_view();
        self.interaction = Interaction::Idle;
    }

    pub fn graph(&self) -> &ProcessGraph {
        &self.graph
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Screen coordinates -> graph space, inverting the current transform.
    pub fn to_graph(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.pan_x) / self.scale, (y - self.pan_y) / self.scale)
    }

    /// Graph space -> screen coordinates.
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.pan_x, y * self.scale + self.pan_y)
    }

    /// Topmost visible node under the pointer, if any. Distance check happens
    /// in graph space against each node's radius.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        let (gx, gy) = self.to_graph(x, y);
        let mut hit: Option<&str> = None;
        for node in self.graph.nodes() {
            if !node.visible {
                continue;
            }
            let dx = gx - node.position.x;
            let dy = gy - node.position.y;
            if (dx * dx + dy * dy).sqrt() <= node.radius {
                // Later nodes draw on top; the last match wins.
                hit = Some(node.id.as_str());
            }
        }
        hit
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if !matches!(self.interaction, Interaction::Idle) {
            return;
        }
        if let Some(id) = self.hit_test(x, y).map(str::to_string) {
            let (gx, gy) = self.to_graph(x, y);
            let node = match self.graph.node(&id) {
                Some(n) => n,
                None => return,
            };
            self.interaction = Interaction::DraggingNode {
                grab_dx: gx - node.position.x,
                grab_dy: gy - node.position.y,
                node_id: id,
            };
        } else {
            self.interaction = Interaction::Panning {
                last_x: x,
                last_y: y,
            };
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        match &mut self.interaction {
            Interaction::Idle => {}
            Interaction::DraggingNode {
                node_id,
                grab_dx,
                grab_dy,
            } => {
                let (gx, gy) = ((x - self.pan_x) / self.scale, (y - self.pan_y) / self.scale);
                let (nx, ny) = (gx - *grab_dx, gy - *grab_dy);
                let id = node_id.clone();
                if let Some(node) = self.graph.node_mut(&id) {
                    node.position.x = nx;
                    node.position.y = ny;
                }
                self.request_redraw();
            }
            Interaction::Panning { last_x, last_y } => {
                let (dx, dy) = (x - *last_x, y - *last_y);
                *last_x = x;
                *last_y = y;
                self.pan_x += dx;
                self.pan_y += dy;
                self.request_redraw();
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.interaction = Interaction::Idle;
    }

    /// Discrete zoom anchored at `(anchor_x, anchor_y)` in screen space: the
    /// graph point under the anchor stays on the same screen pixel. The pan
    /// offset is recomputed from the anchor, the scale ratio, and the prior
    /// offset.
    pub fn zoom(&mut self, factor: f64, anchor_x: f64, anchor_y: f64) {
        let next = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if next == self.scale {
            return;
        }
        let ratio = next / self.scale;
        self.pan_x = anchor_x * (1.0 - ratio) + self.pan_x * ratio;
        self.pan_y = anchor_y * (1.0 - ratio) + self.pan_y * ratio;
        self.scale = next;
        self.request_redraw();
    }

    /// Zoom in, anchored at the viewport center.
    pub fn zoom_in(&mut self) {
        let (cx, cy) = (self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.zoom(ZOOM_IN_FACTOR, cx, cy);
    }

    /// Zoom out, anchored at the viewport center.
    pub fn zoom_out(&mut self) {
        let (cx, cy) = (self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.zoom(ZOOM_OUT_FACTOR, cx, cy);
    }

    pub fn reset_view(&mut self) {
        self.scale = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.request_redraw();
    }

    /// Toggles visibility of the subprocess steps adjacent to a main-process
    /// node (the click-to-expand affordance). Returns whether anything
    /// changed.
    pub fn toggle_subprocess(&mut self, node_id: &str) -> bool {
        match self.graph.node(node_id) {
            Some(node) if node.kind == NodeKind::Main => {}
            _ => return false,
        }
        let neighbors: Vec<String> = self
            .graph
            .neighbors(node_id)
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut changed = false;
        for id in neighbors {
            if let Some(node) = self.graph.node_mut(&id) {
                if node.kind == NodeKind::Sub {
                    node.visible = !node.visible;
                    changed = true;
                }
            }
        }
        if changed {
            self.graph.sync_edge_visibility();
            self.request_redraw();
        }
        changed
    }

    /// Flags that state changed since the last frame. Idempotent; bursts of
    /// pointer events collapse into one pending draw.
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Returns whether a frame should be drawn now. A pending draw inside the
    /// frame interval is dropped, not deferred; the next allowed tick renders
    /// the latest state.
    pub fn take_frame(&mut self, now: Instant) -> bool {
        if !self.needs_redraw {
            return false;
        }
        if let Some(last) = self.last_draw {
            let elapsed_enough = now
                .checked_duration_since(last)
                .is_some_and(|d| d >= FRAME_INTERVAL);
            if !elapsed_enough {
                return false;
            }
        }
        self.needs_redraw = false;
        self.last_draw = Some(now);
        true
    }

    /// Current draw list under the active transform.
    pub fn scene(&self) -> Scene {
        scene::build_scene(
            &self.graph,
            self.scale,
            (self.pan_x, self.pan_y),
            &self.thresholds,
        )
    }
}

fn apply_layout(graph: &mut ProcessGraph, layout: &GraphLayout) {
    for node in graph.nodes_mut() {
        if let Some(placement) = layout.get(&node.id) {
            node.position = placement.position;
            node.radius = placement.radius;
        }
    }
}
