//! Analysis narration.
//!
//! A narration request first probes the summarization service for
//! acceleration, then posts a truncated description of the graph under a hard
//! timeout. Every failure mode (probe unreachable, no acceleration, timeout,
//! non-2xx, bad payload) degrades to the locally computed summary, which never
//! depends on network reachability. Callers therefore always get a result and
//! never an error.

use crate::Result;
use crate::graph::ProcessGraph;
use crate::paths::{self, PathLimits};
use reqwest::blocking::Client;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Caps applied to the request payload. The service sees a sample of the
/// graph, never the whole thing.
const PAYLOAD_MAX_NODES: usize = 100;
const PAYLOAD_MAX_EDGES: usize = 200;
const PAYLOAD_MAX_CONNECTIONS: usize = 20;

#[derive(Debug, Clone)]
pub struct NarratorConfig {
    /// Base URL of the summarization service.
    pub base_url: String,
    /// Hard deadline for each request.
    pub timeout: Duration,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub text: String,
    pub used_fallback: bool,
}

#[derive(Debug, thiserror::Error)]
enum NarrationError {
    #[error("summarization service reports no acceleration")]
    Unavailable,
    #[error("summarization request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("summarization returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Capabilities {
    #[serde(default, rename = "gpuAvailable")]
    gpu_available: bool,
}

#[derive(Debug, Serialize)]
struct GraphDigest {
    #[serde(rename = "nodeCount")]
    node_count: usize,
    #[serde(rename = "edgeCount")]
    edge_count: usize,
    connections: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    analysis: String,
    #[serde(default)]
    fallback: bool,
}

pub struct AnalysisNarrator {
    config: NarratorConfig,
    client: Client,
    in_flight: AtomicBool,
    last_result: Mutex<Option<String>>,
}

impl AnalysisNarrator {
    pub fn new(config: NarratorConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            client,
            in_flight: AtomicBool::new(false),
            last_result: Mutex::new(None),
        })
    }

    /// Narrates the graph, preferring the external summarization service and
    /// falling back to [`fallback_summary`]. Infallible by design.
    ///
    /// One request at a time: a call that arrives while another is in flight
    /// reuses the most recent completed result instead of issuing a parallel
    /// request.
    pub fn narrate_sync(&self, graph: &ProcessGraph) -> AnalysisResult {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("narration already in flight, reusing last result");
            let cached = self
                .last_result
                .lock()
                .ok()
                .and_then(|guard| guard.clone());
            return AnalysisResult {
                text: cached.unwrap_or_else(|| fallback_summary(graph)),
                used_fallback: true,
            };
        }
        let _clear = ClearOnDrop(&self.in_flight);

        match self.request_analysis(graph) {
            Ok(result) => {
                if let Ok(mut guard) = self.last_result.lock() {
                    *guard = Some(result.text.clone());
                }
                result
            }
            Err(err) => {
                tracing::warn!(error = %err, "narration failed, using local summary");
                AnalysisResult {
                    text: fallback_summary(graph),
                    used_fallback: true,
                }
            }
        }
    }

    /// Async variant of [`AnalysisNarrator::narrate_sync`] (executor-free; the
    /// request itself is bounded by the configured timeout).
    pub async fn narrate(&self, graph: &ProcessGraph) -> AnalysisResult {
        self.narrate_sync(graph)
    }

    fn request_analysis(
        &self,
        graph: &ProcessGraph,
    ) -> std::result::Result<AnalysisResult, NarrationError> {
        let capabilities_url = format!("{}/api/llm/capabilities", self.config.base_url);
        let capabilities: Capabilities = self
            .client
            .get(capabilities_url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()?
            .json()?;
        if !capabilities.gpu_available {
            return Err(NarrationError::Unavailable);
        }

        let digest = digest(graph);
        let request = AnalyzeRequest {
            text: serde_json::to_string(&digest)?,
        };
        let analyze_url = format!("{}/api/llm/analyze", self.config.base_url);
        let response = self
            .client
            .post(analyze_url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .json(&request)
            .send()?;
        if !response.status().is_success() {
            return Err(NarrationError::Status(response.status()));
        }
        let body: AnalyzeResponse = response.json()?;
        Ok(AnalysisResult {
            text: body.analysis,
            used_fallback: body.fallback,
        })
    }
}

struct ClearOnDrop<'a>(&'a AtomicBool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn digest(graph: &ProcessGraph) -> GraphDigest {
    let node_count = graph.node_count().min(PAYLOAD_MAX_NODES);
    let edge_count = graph.edge_count().min(PAYLOAD_MAX_EDGES);
    let connections = graph
        .edges()
        .iter()
        .take(PAYLOAD_MAX_CONNECTIONS)
        .map(|e| format!("{}->{}", e.source, e.target))
        .collect();
    GraphDigest {
        node_count,
        edge_count,
        connections,
    }
}

/// Deterministic local summary of the graph's structure. Always available.
pub fn fallback_summary(graph: &ProcessGraph) -> String {
    let mut sources: FxHashSet<&str> = FxHashSet::default();
    let mut targets: FxHashSet<&str> = FxHashSet::default();
    let mut out_degree: rustc_hash::FxHashMap<&str, usize> = rustc_hash::FxHashMap::default();
    for edge in graph.edges() {
        sources.insert(edge.source.as_str());
        targets.insert(edge.target.as_str());
        *out_degree.entry(edge.source.as_str()).or_insert(0) += 1;
    }
    let parallel_branches = out_degree.values().filter(|&&d| d > 1).count();

    let enumerated = paths::find_all_paths(graph, &PathLimits::default());
    let max_depth = enumerated.iter().map(Vec::len).max().unwrap_or(0);
    let avg_connections = graph.edge_count() as f64 / graph.node_count().max(1) as f64;

    let mut out = String::new();
    let _ = writeln!(out, "Local analysis results:");
    let _ = writeln!(out, "- Process Steps: {}", graph.node_count());
    let _ = writeln!(out, "- Connections: {}", graph.edge_count());
    let _ = writeln!(out, "- Entry Points: {}", sources.len());
    let _ = writeln!(out, "- Exit Points: {}", targets.len());
    let _ = writeln!(out, "- Parallel Branches: {parallel_branches}");
    let _ = writeln!(out, "- Maximum Path Length: {max_depth}");
    let _ = write!(out, "- Average Connections per Step: {avg_connections:.2}");
    out
}
