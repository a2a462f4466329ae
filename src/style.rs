//! Style settings: the visual configuration snapshot driving a render.
//!
//! Settings are updated copy-on-write through [`StyleSettings::update`];
//! a partial update always yields a fully valid record. No field-level
//! validation happens here — the fixed catalogs below are what producers
//! (UI, CLI) offer for selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Font families offered for the cloud text.
pub const FONT_OPTIONS: &[&str] = &[
    "Noto Sans SC",
    "Inter",
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
];

/// Fixed color palettes, four hex colors each.
pub const PALETTES: &[[&str; 4]] = &[
    ["#3b82f6", "#1d4ed8", "#1e40af", "#60a5fa"], // blues
    ["#10b981", "#059669", "#047857", "#34d399"], // greens
    ["#f43f5e", "#e11d48", "#be123c", "#fb7185"], // reds
    ["#8b5cf6", "#7c3aed", "#6d28d9", "#a78bfa"], // purples
    ["#f59e0b", "#d97706", "#b45309", "#fbbf24"], // ambers
    ["#1e293b", "#334155", "#475569", "#64748b"], // slates
];

/// Returns palette `index` as owned strings, wrapping out-of-range
/// indices back into the catalog.
pub fn palette(index: usize) -> Vec<String> {
    let p = PALETTES[index % PALETTES.len()];
    p.iter().map(|c| c.to_string()).collect()
}

/// Placement strategy for the external layout algorithm.
///
/// The mode determines the weight scaling factor and, for `Radial`, the
/// placement origin. See [`crate::params::RenderParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Uniform,
    Radial,
    Compact,
}

impl LayoutMode {
    /// Multiplier applied to each word's weight inside the renderer's
    /// sizing function.
    pub fn weight_factor(self) -> f32 {
        match self {
            LayoutMode::Uniform => 8.0,
            LayoutMode::Radial => 10.0,
            LayoutMode::Compact => 14.0,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayoutMode::Uniform => "uniform",
            LayoutMode::Radial => "radial",
            LayoutMode::Compact => "compact",
        };
        f.write_str(name)
    }
}

impl FromStr for LayoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(LayoutMode::Uniform),
            "radial" => Ok(LayoutMode::Radial),
            "compact" => Ok(LayoutMode::Compact),
            other => Err(Error::Config(format!("unknown layout mode: {}", other))),
        }
    }
}

/// Visual configuration for a render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSettings {
    /// One of [`FONT_OPTIONS`]
    pub font_family: String,
    /// Hex background color, ignored while `is_transparent` is set
    pub background_color: String,
    /// Render on a transparent surface instead of a filled one
    pub is_transparent: bool,
    /// Non-empty ordered set of hex colors; one is chosen uniformly at
    /// random per rendered word
    pub color_palette: Vec<String>,
    /// Fraction of words eligible for rotated placement, in [0, 1]
    pub rotation_ratio: f32,
    /// Lower bound for rendered font sizes
    pub min_font_size: u32,
    /// Upper bound for rendered font sizes (min <= max)
    pub max_font_size: u32,
    /// Placement strategy
    pub layout: LayoutMode,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            font_family: FONT_OPTIONS[0].to_string(),
            background_color: "#ffffff".to_string(),
            is_transparent: false,
            color_palette: palette(0),
            rotation_ratio: 0.5,
            min_font_size: 4,
            max_font_size: 80,
            layout: LayoutMode::Uniform,
        }
    }
}

/// Partial update for [`StyleSettings`]; `None` fields keep the prior
/// value.
#[derive(Debug, Clone, Default)]
pub struct StyleUpdate {
    pub font_family: Option<String>,
    pub background_color: Option<String>,
    pub is_transparent: Option<bool>,
    pub color_palette: Option<Vec<String>>,
    pub rotation_ratio: Option<f32>,
    pub min_font_size: Option<u32>,
    pub max_font_size: Option<u32>,
    pub layout: Option<LayoutMode>,
}

impl StyleSettings {
    /// Merge only the provided fields into a new snapshot; the receiver
    /// is never mutated.
    pub fn update(&self, update: StyleUpdate) -> Self {
        Self {
            font_family: update.font_family.unwrap_or_else(|| self.font_family.clone()),
            background_color: update
                .background_color
                .unwrap_or_else(|| self.background_color.clone()),
            is_transparent: update.is_transparent.unwrap_or(self.is_transparent),
            color_palette: update
                .color_palette
                .unwrap_or_else(|| self.color_palette.clone()),
            rotation_ratio: update.rotation_ratio.unwrap_or(self.rotation_ratio),
            min_font_size: update.min_font_size.unwrap_or(self.min_font_size),
            max_font_size: update.max_font_size.unwrap_or(self.max_font_size),
            layout: update.layout.unwrap_or(self.layout),
        }
    }
}
