//! SVG snapshot writer for a built scene.

use crate::scene::{Scene, SceneNode};
use flowlens_core::graph::NodeKind;
use std::fmt::Write as _;

const MAIN_FILL: &str = "#3498db";
const SUB_FILL: &str = "#95a5a6";
const EDGE_STROKE: &str = "#7f8c8d";
const HIGHLIGHT_STROKE: &str = "#e74c3c";
const LABEL_FILL: &str = "#2c3e50";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    pub width: f64,
    pub height: f64,
    pub background: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: None,
        }
    }
}

/// Writes the scene in draw order: edges (with arrowheads), nodes, labels.
pub fn render_scene_svg(scene: &Scene, options: &SvgRenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        fmt(options.width),
        fmt(options.height),
        fmt(options.width),
        fmt(options.height)
    );
    out.push_str(concat!(
        "<defs>",
        r#"<marker id="arrow" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="7" markerHeight="7" orient="auto-start-reverse">"#,
        r#"<path d="M 0 0 L 10 5 L 0 10 z"/>"#,
        "</marker></defs>\n",
    ));
    if let Some(background) = &options.background {
        let _ = writeln!(
            out,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            xml_escape(background)
        );
    }

    for edge in &scene.edges {
        let _ = writeln!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{EDGE_STROKE}" stroke-width="1.5" marker-end="url(#arrow)"/>"#,
            fmt(edge.x1),
            fmt(edge.y1),
            fmt(edge.x2),
            fmt(edge.y2)
        );
    }

    for node in &scene.nodes {
        let _ = writeln!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            fmt(node.x),
            fmt(node.y),
            fmt(node.radius),
            node_fill(node)
        );
        if node.highlighted {
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{HIGHLIGHT_STROKE}" stroke-width="3"/>"#,
                fmt(node.x),
                fmt(node.y),
                fmt(node.radius + 4.0)
            );
        }
    }

    for label in &scene.labels {
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12" fill="{LABEL_FILL}">{}</text>"#,
            fmt(label.x),
            fmt(label.y),
            xml_escape(&label.text)
        );
    }

    out.push_str("</svg>");
    out
}

fn node_fill(node: &SceneNode) -> &'static str {
    match node.kind {
        NodeKind::Main => MAIN_FILL,
        NodeKind::Sub => SUB_FILL,
    }
}

fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    let mut s = format!("{rounded:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
