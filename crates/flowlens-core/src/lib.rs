#![forbid(unsafe_code)]

//! Process-flow extraction + metrics engine (headless).
//!
//! Design goals:
//! - deterministic, testable outputs (pure metric functions, ordered graphs)
//! - bounded cost on arbitrary uploads (batch parsing, truncated enumeration)
//! - async entry points that require no particular executor

pub mod error;
pub mod graph;
pub mod metrics;
pub mod narrate;
pub mod parse;
pub mod paths;
pub mod report;
pub mod validate;

pub use error::{Error, Result};
pub use graph::{Edge, Node, NodeKind, NodeMetrics, Position, ProcessGraph};
pub use metrics::{Bottleneck, BottleneckCategory, MetricsSnapshot};
pub use narrate::{AnalysisNarrator, AnalysisResult, NarratorConfig};
pub use parse::EdgeListFormat;
pub use paths::{PathLimits, ProcessPath};
pub use report::MetricsReport;

/// Everything derived from one uploaded dataset. Replaced wholesale when a new
/// dataset is loaded; never updated incrementally.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub graph: ProcessGraph,
    pub paths: Vec<ProcessPath>,
    pub metrics: MetricsSnapshot,
}

/// Parses, enumerates, and measures one dataset in a single synchronous pass.
pub fn analyze_sync(raw: &str, format: EdgeListFormat, limits: &PathLimits) -> Result<Dataset> {
    let graph = parse::parse(raw, format)?;
    let paths = paths::find_all_paths(&graph, limits);
    let metrics = metrics::snapshot(&graph, &paths);
    Ok(Dataset {
        graph,
        paths,
        metrics,
    })
}

/// Async variant of [`analyze_sync`].
///
/// Parsing and enumeration are CPU-bound; this wrapper exists so callers in
/// async contexts don't need a separate code path. No executor is required.
pub async fn analyze(raw: &str, format: EdgeListFormat, limits: &PathLimits) -> Result<Dataset> {
    analyze_sync(raw, format, limits)
}

/// Owns the active dataset and the narration client for the lifetime of the
/// process. The metrics pipeline never waits on narration: [`Pipeline::load`]
/// returns the snapshot before any network request is made.
pub struct Pipeline {
    limits: PathLimits,
    narrator: AnalysisNarrator,
    dataset: Option<Dataset>,
}

impl Pipeline {
    pub fn new() -> Result<Self> {
        Self::with_config(PathLimits::default(), NarratorConfig::default())
    }

    pub fn with_config(limits: PathLimits, narrator: NarratorConfig) -> Result<Self> {
        Ok(Self {
            limits,
            narrator: AnalysisNarrator::new(narrator)?,
            dataset: None,
        })
    }

    /// Replaces the active dataset with one parsed from `raw`. The previous
    /// graph and everything derived from it are discarded.
    pub fn load(&mut self, raw: &str, format: EdgeListFormat) -> Result<&Dataset> {
        let dataset = analyze_sync(raw, format, &self.limits)?;
        Ok(self.dataset.insert(dataset))
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn clear(&mut self) {
        self.dataset = None;
    }

    /// Snapshot for the active dataset, or the zeroed snapshot when none is
    /// loaded.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.dataset
            .as_ref()
            .map(|d| d.metrics.clone())
            .unwrap_or_else(MetricsSnapshot::empty)
    }

    /// Metric cards for the active dataset, or the awaiting-data cards.
    pub fn report(&self) -> MetricsReport {
        match &self.dataset {
            Some(d) => report::dataset_report(&d.graph, &d.paths),
            None => report::awaiting_data(),
        }
    }

    /// Narrates the active dataset. `None` when no dataset is loaded.
    pub fn narrate(&self) -> Option<AnalysisResult> {
        self.dataset
            .as_ref()
            .map(|d| self.narrator.narrate_sync(&d.graph))
    }
}

#[cfg(test)]
mod tests;
