#![forbid(unsafe_code)]

//! Headless visualization pipeline for process graphs: layout strategies, a
//! viewport/interaction controller, scene building, and SVG snapshots.
//!
//! Nothing here draws to a real surface; the scene is an ordered description
//! (edges beneath nodes beneath labels) that a host canvas or the bundled SVG
//! writer can consume.

pub mod layout;
pub mod scene;
pub mod svg;
pub mod viewport;

pub use layout::{GraphLayout, LayoutStrategy, Placement};
pub use scene::{HighlightThresholds, Scene};
pub use svg::SvgRenderOptions;
pub use viewport::{Interaction, ViewportController};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("render surface unavailable: {message}")]
    Setup { message: String },
}

impl Error {
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Size of the drawing surface, in screen units.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A missing or collapsed surface fails the visualization feature only;
    /// the metrics pipeline is unaffected.
    pub fn ensure_drawable(&self) -> Result<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(Error::setup("viewport size is not finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::setup("viewport has zero area"));
        }
        Ok(())
    }
}
