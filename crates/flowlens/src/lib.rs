#![forbid(unsafe_code)]

//! `flowlens` turns a plain edge list describing a business process into a
//! directed graph, process-mining style metrics, and (with the `render`
//! feature) an interactive-ready layout plus SVG snapshots.
//!
//! # Features
//!
//! - `render`: enable layout, viewport interaction, and SVG output
//!   (`flowlens::render`)

pub use flowlens_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use flowlens_render::svg::render_scene_svg;
    pub use flowlens_render::viewport::{
        FRAME_INTERVAL, MAX_SCALE, MIN_SCALE, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
    };
    pub use flowlens_render::{
        Error, GraphLayout, HighlightThresholds, Interaction, LayoutStrategy, Placement, Result,
        Scene, SvgRenderOptions, Viewport, ViewportController, layout, scene, svg, viewport,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] flowlens_core::Error),
        #[error(transparent)]
        Render(#[from] flowlens_render::Error),
    }

    pub type HeadlessResult<T> = std::result::Result<T, HeadlessError>;

    /// One-call pipeline: parse, enumerate, measure, lay out.
    ///
    /// This is the synchronous entry point UI integrations use when an async
    /// executor would be awkward; the work is CPU-bound.
    pub fn analyze_and_layout_sync(
        raw: &str,
        format: flowlens_core::EdgeListFormat,
        viewport: Viewport,
        strategy: LayoutStrategy,
    ) -> HeadlessResult<(flowlens_core::Dataset, GraphLayout)> {
        let dataset =
            flowlens_core::analyze_sync(raw, format, &flowlens_core::PathLimits::default())?;
        let placed = layout::layout(&dataset.graph, &viewport, strategy)?;
        Ok((dataset, placed))
    }

    /// Async variant of [`analyze_and_layout_sync`] (executor-free).
    pub async fn analyze_and_layout(
        raw: &str,
        format: flowlens_core::EdgeListFormat,
        viewport: Viewport,
        strategy: LayoutStrategy,
    ) -> HeadlessResult<(flowlens_core::Dataset, GraphLayout)> {
        analyze_and_layout_sync(raw, format, viewport, strategy)
    }
}
