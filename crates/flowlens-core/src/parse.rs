//! Edge-list parsing.
//!
//! Two input shapes are accepted: free-form whitespace/comma separated lines
//! (`source target`) and CSV rows. Both produce the same [`ProcessGraph`];
//! blank lines are ignored and lines without two usable fields are skipped
//! rather than rejected, so a handful of malformed rows never sinks an upload.

use crate::graph::ProcessGraph;
use crate::{Error, Result};

/// Lines are consumed in batches of this size so one huge upload is processed
/// incrementally instead of as a single working set.
const LINE_BATCH: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeListFormat {
    #[default]
    Whitespace,
    Csv,
}

impl EdgeListFormat {
    /// Picks a format from a file name: `.csv` means CSV, everything else is
    /// treated as whitespace-delimited text.
    pub fn from_filename(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".csv") {
            Self::Csv
        } else {
            Self::Whitespace
        }
    }
}

impl std::str::FromStr for EdgeListFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whitespace" | "txt" | "text" => Ok(Self::Whitespace),
            "csv" => Ok(Self::Csv),
            _ => Err(()),
        }
    }
}

/// Parses raw edge-list text into a graph.
///
/// Fails when the input yields zero nodes or zero edges after blank-line
/// filtering; an empty graph is a validation failure, not a degenerate
/// success.
pub fn parse(raw: &str, format: EdgeListFormat) -> Result<ProcessGraph> {
    let mut graph = ProcessGraph::new();

    let mut lines = raw.lines();
    let mut batches = 0usize;
    loop {
        let mut consumed = 0usize;
        for line in lines.by_ref().take(LINE_BATCH) {
            consumed += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match format {
                EdgeListFormat::Whitespace => parse_whitespace_line(&mut graph, line),
                EdgeListFormat::Csv => parse_csv_line(&mut graph, line),
            }
        }
        if consumed == 0 {
            break;
        }
        batches += 1;
    }
    tracing::debug!(
        batches,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "parsed edge list"
    );

    if graph.is_empty() {
        return Err(Error::parse("no valid connections found in file"));
    }
    Ok(graph)
}

fn parse_whitespace_line(graph: &mut ProcessGraph, line: &str) {
    let mut tokens = line.split(is_separator).filter(|t| !t.is_empty());
    let (Some(source), Some(target)) = (tokens.next(), tokens.next()) else {
        return;
    };
    graph.push_edge(source, target);
    let duration = tokens.next().and_then(parse_metric);
    let cost = tokens.next().and_then(parse_metric);
    graph.record_node_metrics(target, duration, cost);
}

fn parse_csv_line(graph: &mut ProcessGraph, line: &str) {
    let mut fields = line.split(',').map(|f| strip_quotes(f.trim()));
    let (Some(source), Some(target)) = (fields.next(), fields.next()) else {
        return;
    };
    if source.is_empty() || target.is_empty() {
        return;
    }
    graph.push_edge(&source, &target);
    let duration = fields.next().and_then(|f| parse_metric(&f));
    let cost = fields.next().and_then(|f| parse_metric(&f));
    graph.record_node_metrics(&target, duration, cost);
}

fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t' || c == ','
}

fn parse_metric(token: impl AsRef<str>) -> Option<f64> {
    let value: f64 = token.as_ref().parse().ok()?;
    value.is_finite().then_some(value)
}

fn strip_quotes(field: &str) -> String {
    let stripped = field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .or_else(|| field.strip_prefix('\'').and_then(|f| f.strip_suffix('\'')));
    stripped.unwrap_or(field).to_string()
}
