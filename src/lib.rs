//! LightCloud Engine
//!
//! A word-cloud authoring engine API for Rust: weighted keywords plus a
//! visual style snapshot drive a live-rendered 2D cloud over a pixel
//! surface, exportable as a PNG image.
//!
//! # Features
//!
//! - **Pure state models**: word list and style settings are immutable
//!   snapshots updated through pure transition functions
//! - **Adapter boundaries**: the layout algorithm and the keyword
//!   generation service are injected capabilities, not baked-in code
//! - **Debounced rendering**: rapid edits coalesce into one layout pass
//!
//! # Example
//!
//! ```no_run
//! use lightcloud::{Studio, StudioConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut studio = Studio::new(StudioConfig::default(), None)?;
//! studio.add_word("边缘计算", 4.0);
//! let png = studio.export_png().await?;
//! std::fs::write("cloud.png", png)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod params;
pub mod render;
pub mod style;
pub mod surface;
pub mod words;

// Keyword suggestion backend (remote generation service)
#[cfg(feature = "suggest")]
pub mod suggest;

// Async-friendly state owner + debounced render scheduler
pub mod studio;

pub use params::{ColorFn, RenderParams, WeightFn};
pub use render::{CloudBackend, Renderer};
pub use studio::{Studio, StudioConfig};
pub use style::{LayoutMode, StyleSettings, StyleUpdate, FONT_OPTIONS, PALETTES};
pub use surface::Surface;
pub use words::{IdGen, Word, WordList};

#[cfg(feature = "suggest")]
pub use suggest::{SuggestConfig, SuggestionClient};

/// Canvas dimensions for the render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        // Reference preview resolution
        Self {
            width: 1000,
            height: 1000,
        }
    }
}

/// Unix timestamp in milliseconds, used for export file names and
/// suggestion-derived ids.
pub fn now_millis() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
