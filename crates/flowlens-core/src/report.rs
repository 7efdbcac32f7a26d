//! Human-readable metric breakdowns.
//!
//! Each metric gets a card (headline value plus breakdown rows) and a longer
//! detail analysis used by drill-down views. Phrasing is deterministic and
//! computed locally; nothing here touches the network.

use crate::graph::ProcessGraph;
use crate::metrics::{self, BottleneckCategory};
use crate::paths::ProcessPath;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricBreakdown {
    pub process: String,
    pub subprocess: String,
    pub value: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub value: String,
    pub breakdowns: Vec<MetricBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsReport {
    pub cycle_time: MetricCard,
    pub variants: MetricCard,
    pub bottlenecks: MetricCard,
}

/// Cards for one loaded dataset.
pub fn dataset_report(graph: &ProcessGraph, paths: &[ProcessPath]) -> MetricsReport {
    let cycle_time = metrics::cycle_time(paths);
    let variants = metrics::variant_count(paths);
    let bottleneck_count = metrics::bottleneck_count(graph);

    MetricsReport {
        cycle_time: MetricCard {
            value: format!("{cycle_time:.1}"),
            breakdowns: vec![MetricBreakdown {
                process: "Process Analysis".to_string(),
                subprocess: "Cycle Time".to_string(),
                value: format!("{cycle_time:.1}"),
                details: format!(
                    "Based on {} nodes and {} connections",
                    graph.node_count(),
                    graph.edge_count()
                ),
            }],
        },
        variants: MetricCard {
            value: variants.to_string(),
            breakdowns: vec![MetricBreakdown {
                process: "Process Analysis".to_string(),
                subprocess: "Variants".to_string(),
                value: variants.to_string(),
                details: format!("Found {variants} unique process paths"),
            }],
        },
        bottlenecks: MetricCard {
            value: bottleneck_count.to_string(),
            breakdowns: vec![MetricBreakdown {
                process: "Process Analysis".to_string(),
                subprocess: "Bottlenecks".to_string(),
                value: bottleneck_count.to_string(),
                details: format!("Identified {bottleneck_count} potential bottlenecks"),
            }],
        },
    }
}

/// Cards for the no-dataset state.
pub fn awaiting_data() -> MetricsReport {
    let card = |value: &str, details: &str| MetricCard {
        value: value.to_string(),
        breakdowns: vec![MetricBreakdown {
            process: "Awaiting Data".to_string(),
            subprocess: "No process data".to_string(),
            value: value.to_string(),
            details: details.to_string(),
        }],
    };
    MetricsReport {
        cycle_time: card("0.0", "Upload data to calculate cycle time"),
        variants: card("0", "Upload data to analyze variants"),
        bottlenecks: card("0", "Upload data to identify bottlenecks"),
    }
}

/// Drill-down text for the cycle-time metric.
pub fn cycle_time_analysis(paths: &[ProcessPath]) -> String {
    let cycle_time = metrics::cycle_time(paths);
    let shortest = paths.iter().map(Vec::len).min().unwrap_or(0);
    let longest = paths.iter().map(Vec::len).max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "Average Cycle Time: {cycle_time:.1}");
    let _ = writeln!(out, "Shortest Path: {shortest} steps");
    let _ = writeln!(out, "Longest Path: {longest} steps");
    let _ = writeln!(out, "Total Paths Analyzed: {}", paths.len());
    out.push_str("This metric indicates the average number of steps required to complete the process.");
    out
}

/// Drill-down text for the variants metric: total plus the first three paths.
pub fn variant_analysis(paths: &[ProcessPath]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Variants: {}", paths.len());
    let _ = writeln!(out, "Most Common Paths:");
    for (i, path) in paths.iter().take(3).enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, path.join(" -> "));
    }
    if paths.len() > 3 {
        let _ = writeln!(out, "And {} more variants...", paths.len() - 3);
    }
    out.trim_end().to_string()
}

/// Drill-down text for the bottlenecks metric: the top candidates with their
/// category and an impact phrase.
pub fn bottleneck_analysis(graph: &ProcessGraph) -> String {
    let top = metrics::bottlenecks(graph);

    let mut out = String::new();
    let _ = writeln!(out, "Identified Bottlenecks: {}", top.len());
    let _ = writeln!(out, "Top Bottleneck Points:");
    for b in &top {
        let _ = writeln!(out, "- {} ({})", b.node_id, b.category);
        let _ = writeln!(out, "  {} incoming connections", b.incoming_count);
        let _ = writeln!(
            out,
            "  Impact: {}",
            bottleneck_impact(b.incoming_count, b.category)
        );
    }
    out.push_str("These points require attention as they represent convergence of multiple process flows.");
    out
}

fn bottleneck_impact(count: usize, category: BottleneckCategory) -> &'static str {
    if category == BottleneckCategory::MergePoint {
        "Data consolidation point that may cause processing delays"
    } else if count > 10 {
        "Critical congestion point requiring immediate review"
    } else if count > 5 {
        "Moderate bottleneck with potential for queue formation"
    } else {
        "Minor convergence point to monitor"
    }
}
