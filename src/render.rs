//! External renderer boundary.
//!
//! The word-cloud layout algorithm (spiral placement, collision
//! avoidance, rotation, shrink-to-fit) is a closed external capability.
//! It plugs in behind [`CloudBackend`]; the [`Renderer`] wrapper owns the
//! surface-preparation contract around it and degrades to a logged no-op
//! when no backend is installed.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::params::RenderParams;
use crate::surface::Surface;

/// The external word-cloud drawing capability.
///
/// Implementations receive the prepared surface and the fully-resolved
/// parameter set and mutate the surface in place. Per-word placement
/// success is owned by the backend and not reported back.
pub trait CloudBackend: Send {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Run one layout/draw pass over the surface.
    fn draw(&mut self, surface: &mut Surface, params: &RenderParams) -> Result<()>;
}

/// Boundary wrapper invoking the external drawing capability.
pub struct Renderer {
    backend: Option<Box<dyn CloudBackend>>,
}

impl Renderer {
    pub fn new(backend: Option<Box<dyn CloudBackend>>) -> Self {
        Self { backend }
    }

    /// A renderer with the external capability missing; renders become
    /// silent no-ops.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: Box<dyn CloudBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Fail when no backend is installed, for callers that want a hard
    /// error instead of the default silent skip.
    pub fn ensure_available(&self) -> Result<()> {
        if self.backend.is_some() {
            Ok(())
        } else {
            Err(Error::RendererUnavailable)
        }
    }

    /// Run one render pass: clear the surface, fill the background
    /// unless transparent, then hand off to the backend.
    ///
    /// With no backend installed the surface is left untouched and the
    /// call succeeds.
    pub fn render(&mut self, surface: &mut Surface, params: &RenderParams) -> Result<()> {
        let backend = match self.backend.as_mut() {
            Some(b) => b,
            None => {
                warn!("word-cloud backend not installed; skipping render");
                return Ok(());
            }
        };

        surface.clear();
        if !params.is_transparent() {
            surface.fill(&params.background_color)?;
        }

        debug!(
            "render pass: {} words, layout factor {}, backend {}",
            params.list.len(),
            params.weight_factor,
            backend.name()
        );
        backend.draw(surface, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{StyleSettings, StyleUpdate};
    use crate::words::WordList;
    use crate::CanvasSize;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingBackend {
        draws: Arc<AtomicUsize>,
    }

    impl CloudBackend for CountingBackend {
        fn name(&self) -> &str {
            "counting"
        }

        fn draw(&mut self, _surface: &mut Surface, _params: &RenderParams) -> Result<()> {
            self.draws.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn small_surface() -> Surface {
        Surface::new(CanvasSize {
            width: 8,
            height: 8,
        })
        .unwrap()
    }

    fn params(settings: &StyleSettings) -> RenderParams {
        RenderParams::compute(
            &WordList::seed(),
            settings,
            CanvasSize {
                width: 8,
                height: 8,
            },
        )
    }

    #[test]
    fn unavailable_renderer_is_a_silent_noop() {
        let mut surface = small_surface();
        surface.fill("#00ff00").unwrap();
        let mut renderer = Renderer::unavailable();
        renderer
            .render(&mut surface, &params(&StyleSettings::default()))
            .unwrap();
        // surface untouched, not even cleared
        let px = surface.pixmap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (0, 255, 0));
        assert!(renderer.ensure_available().is_err());
    }

    #[test]
    fn opaque_render_fills_background_before_draw() {
        let mut surface = small_surface();
        let draws = Arc::new(AtomicUsize::new(0));
        let mut renderer = Renderer::with_backend(Box::new(CountingBackend {
            draws: draws.clone(),
        }));
        renderer
            .render(&mut surface, &params(&StyleSettings::default()))
            .unwrap();
        let px = surface.pixmap().pixel(4, 4).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 255, 255, 255));
        assert_eq!(draws.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transparent_render_leaves_surface_unfilled() {
        let mut surface = small_surface();
        surface.fill("#ff0000").unwrap();
        let settings = StyleSettings::default().update(StyleUpdate {
            is_transparent: Some(true),
            ..Default::default()
        });
        let mut renderer = Renderer::with_backend(Box::new(CountingBackend {
            draws: Arc::new(AtomicUsize::new(0)),
        }));
        renderer.render(&mut surface, &params(&settings)).unwrap();
        // cleared but not filled
        assert_eq!(surface.pixmap().pixel(4, 4).unwrap().alpha(), 0);
    }

    #[test]
    fn backend_is_invoked_once_per_render() {
        let mut surface = small_surface();
        let draws = Arc::new(AtomicUsize::new(0));
        let mut renderer = Renderer::with_backend(Box::new(CountingBackend {
            draws: draws.clone(),
        }));
        let p = params(&StyleSettings::default());
        renderer.render(&mut surface, &p).unwrap();
        renderer.render(&mut surface, &p).unwrap();
        assert_eq!(draws.load(Ordering::SeqCst), 2);
        assert!(renderer.is_available());
    }
}
