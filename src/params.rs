//! Render parameter mapper.
//!
//! [`RenderParams::compute`] is the only place that reads both the word
//! list and the style settings. It deterministically derives the full
//! argument set for one pass of the external layout algorithm; only the
//! per-word color choice is sampled at draw time.

use std::fmt;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::style::{LayoutMode, StyleSettings};
use crate::words::WordList;
use crate::CanvasSize;

/// Per-word color source, re-evaluated for every placed word.
pub type ColorFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Sizing function applied to each word's weight by the backend.
pub type WeightFn = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

/// Builds a [`ColorFn`] choosing uniformly at random from `palette`.
///
/// With `seed` set the sequence is reproducible, which keeps draw-time
/// color assignment deterministic under test. An empty palette falls
/// back to black so the mapper stays total.
pub fn palette_picker(palette: Vec<String>, seed: Option<u64>) -> ColorFn {
    let seeded = seed.map(|s| Mutex::new(StdRng::seed_from_u64(s)));
    Arc::new(move || {
        if palette.is_empty() {
            return "#000000".to_string();
        }
        let idx = match &seeded {
            Some(rng) => match rng.lock() {
                Ok(mut rng) => rng.gen_range(0..palette.len()),
                Err(_) => 0,
            },
            None => rand::thread_rng().gen_range(0..palette.len()),
        };
        palette[idx].clone()
    })
}

/// The fully-resolved argument set for one render pass.
///
/// Mirrors the external renderer's input contract: an ordered
/// `(text, weight)` list, font settings, a draw-time color source, the
/// rotation/packing knobs, and an optional placement origin.
#[derive(Clone)]
pub struct RenderParams {
    /// `(text, weight)` pairs in word-list order; the backend does its
    /// own sorting and placement
    pub list: Vec<(String, f32)>,
    pub font_family: String,
    pub font_weight: String,
    /// Called once per placed word
    pub color: ColorFn,
    /// Fraction of words eligible for rotated placement
    pub rotate_ratio: f32,
    /// Discrete rotation angles available to the backend
    pub rotation_steps: u32,
    /// Hex color, or `"transparent"` when no fill is wanted
    pub background_color: String,
    /// Packing granularity in pixels
    pub grid_size: u32,
    /// Layout-mode weight multiplier, also baked into `weight_fn`
    pub weight_factor: f32,
    /// Sizing function the backend applies to each word's weight
    pub weight_fn: WeightFn,
    /// Lower bound for rendered font sizes
    pub min_size: u32,
    /// Words that do not fit are dropped rather than drawn clipped
    pub draw_out_of_bound: bool,
    /// Oversized words shrink to fit rather than being excluded
    pub shrink_to_fit: bool,
    /// Placement origin; `None` leaves the backend default spiral
    pub origin: Option<(f32, f32)>,
}

impl fmt::Debug for RenderParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderParams")
            .field("list", &self.list)
            .field("font_family", &self.font_family)
            .field("font_weight", &self.font_weight)
            .field("rotate_ratio", &self.rotate_ratio)
            .field("rotation_steps", &self.rotation_steps)
            .field("background_color", &self.background_color)
            .field("grid_size", &self.grid_size)
            .field("weight_factor", &self.weight_factor)
            .field("min_size", &self.min_size)
            .field("draw_out_of_bound", &self.draw_out_of_bound)
            .field("shrink_to_fit", &self.shrink_to_fit)
            .field("origin", &self.origin)
            .finish()
    }
}

impl RenderParams {
    /// Derive the renderer invocation from the current state. Total over
    /// its inputs; repeated calls differ only in draw-time color
    /// sampling.
    pub fn compute(words: &WordList, settings: &StyleSettings, canvas: CanvasSize) -> Self {
        let color = palette_picker(settings.color_palette.clone(), None);
        Self::compute_with_color(words, settings, canvas, color)
    }

    /// Same as [`RenderParams::compute`] with an explicit color source,
    /// for callers that need reproducible color assignment.
    pub fn compute_with_color(
        words: &WordList,
        settings: &StyleSettings,
        canvas: CanvasSize,
        color: ColorFn,
    ) -> Self {
        let factor = settings.layout.weight_factor();
        let weight_fn: WeightFn = Arc::new(move |size| size * factor);
        Self {
            list: words
                .words()
                .iter()
                .map(|w| (w.text.clone(), w.weight))
                .collect(),
            font_family: settings.font_family.clone(),
            font_weight: "bold".to_string(),
            color,
            rotate_ratio: settings.rotation_ratio,
            rotation_steps: 2,
            background_color: if settings.is_transparent {
                "transparent".to_string()
            } else {
                settings.background_color.clone()
            },
            grid_size: 8,
            weight_factor: factor,
            weight_fn,
            min_size: settings.min_font_size,
            draw_out_of_bound: false,
            shrink_to_fit: true,
            origin: match settings.layout {
                LayoutMode::Radial => Some((
                    canvas.width as f32 / 2.0,
                    canvas.height as f32 / 2.0,
                )),
                LayoutMode::Uniform | LayoutMode::Compact => None,
            },
        }
    }

    /// Whether the surface should be left unfilled before drawing.
    pub fn is_transparent(&self) -> bool {
        self.background_color == "transparent"
    }
}
