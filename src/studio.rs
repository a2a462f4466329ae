//! Studio: canonical application state plus the render scheduler.
//!
//! The studio owns the word list and style settings as immutable
//! snapshots updated through the pure model operations. Every change
//! derives fresh render parameters and posts them to a dedicated worker
//! thread that owns the surface and the renderer, so callers get an
//! async-friendly interface without sharing the pixel surface across
//! threads.
//!
//! Render requests debounce: the worker waits for the settle window to
//! pass without newer requests before drawing, and a newer request
//! supersedes a pending one rather than queuing behind it. Exports round
//! trip through the same worker, so reads are serialized with renders.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use log::warn;
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::params::RenderParams;
use crate::render::{CloudBackend, Renderer};
use crate::style::{StyleSettings, StyleUpdate};
use crate::surface::Surface;
use crate::words::{IdGen, Word, WordList};
use crate::CanvasSize;

#[cfg(feature = "suggest")]
use crate::suggest::SuggestionClient;

enum Command {
    Render(RenderParams),
    ExportPng(oneshot::Sender<Result<Vec<u8>>>),
    ExportDataUrl(oneshot::Sender<Result<String>>),
    Close(oneshot::Sender<Result<()>>),
}

/// Configuration for a [`Studio`].
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub canvas: CanvasSize,
    /// Quiet window a render request must survive before it is drawn
    pub settle: Duration,
    /// Word list shown before any editing
    pub initial_words: WordList,
    pub settings: StyleSettings,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            settle: Duration::from_millis(100),
            initial_words: WordList::seed(),
            settings: StyleSettings::default(),
        }
    }
}

/// Owns the canonical word list + style settings and drives the
/// render worker.
pub struct Studio {
    cmd_tx: Sender<Command>,
    words: WordList,
    settings: StyleSettings,
    ids: IdGen,
    canvas: CanvasSize,
}

impl Studio {
    /// Create a studio (spawns the worker thread that owns the surface
    /// and renderer) and schedule the initial render.
    pub fn new(config: StudioConfig, backend: Option<Box<dyn CloudBackend>>) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = mpsc::channel::<Result<()>>();

        let canvas = config.canvas;
        let settle = config.settle;

        thread::spawn(move || {
            // Create the surface on the worker thread; it never leaves it.
            let mut surface = match Surface::new(canvas) {
                Ok(s) => s,
                Err(e) => {
                    let _ = init_tx.send(Err(e));
                    return;
                }
            };
            let mut renderer = Renderer::new(backend);
            let _ = init_tx.send(Ok(()));

            let mut pending: Option<RenderParams> = None;
            loop {
                let next = if pending.is_some() {
                    match cmd_rx.recv_timeout(settle) {
                        Ok(cmd) => Some(cmd),
                        // Input settled: draw the latest request.
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                } else {
                    match cmd_rx.recv() {
                        Ok(cmd) => Some(cmd),
                        Err(_) => break,
                    }
                };

                match next {
                    Some(Command::Render(params)) => {
                        // Supersede any pending request.
                        pending = Some(params);
                    }
                    Some(Command::ExportPng(resp)) => {
                        flush(&mut renderer, &mut surface, &mut pending);
                        let _ = resp.send(surface.export_png());
                    }
                    Some(Command::ExportDataUrl(resp)) => {
                        flush(&mut renderer, &mut surface, &mut pending);
                        let _ = resp.send(surface.to_data_url());
                    }
                    Some(Command::Close(resp)) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                    None => {
                        flush(&mut renderer, &mut surface, &mut pending);
                    }
                }
            }
        });

        init_rx
            .recv()
            .map_err(|_| Error::Other("render worker died during init".to_string()))??;

        let studio = Self {
            cmd_tx,
            words: config.initial_words,
            settings: config.settings,
            ids: IdGen::new(),
            canvas,
        };
        studio.schedule_render();
        Ok(studio)
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn settings(&self) -> &StyleSettings {
        &self.settings
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Prepend a word; blank text is silently ignored.
    pub fn add_word(&mut self, text: &str, weight: f32) {
        let next = self.words.add(text, weight, &mut self.ids);
        if next.len() != self.words.len() {
            self.words = next;
            self.schedule_render();
        }
    }

    pub fn remove_word(&mut self, id: &str) {
        self.words = self.words.remove(id);
        self.schedule_render();
    }

    pub fn update_weight(&mut self, id: &str, weight: f32) {
        self.words = self.words.update_weight(id, weight);
        self.schedule_render();
    }

    /// Wholesale word-list replacement (suggestion results).
    pub fn replace_words(&mut self, words: Vec<Word>) {
        self.words = self.words.replace_all(words);
        self.schedule_render();
    }

    pub fn update_style(&mut self, update: StyleUpdate) {
        self.settings = self.settings.update(update);
        self.schedule_render();
    }

    /// Re-run the layout with unchanged content (colors re-roll).
    pub fn refresh(&self) {
        self.schedule_render();
    }

    /// Replace the word list from the suggestion service. On failure the
    /// list is left untouched and the error is returned once. Taking
    /// `&mut self` keeps a second request from starting while one is
    /// outstanding.
    #[cfg(feature = "suggest")]
    pub fn suggest(&mut self, client: &SuggestionClient, topic: &str) -> Result<()> {
        let words = client.suggest(topic)?;
        self.replace_words(words);
        Ok(())
    }

    /// Export the current surface as PNG bytes. Any pending render is
    /// drawn first so the export reflects the latest state.
    pub async fn export_png(&self) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::ExportPng(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("export canceled: {}", e)))?
    }

    /// Export the current surface as a base64 PNG data URL.
    pub async fn export_data_url(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::ExportDataUrl(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("export canceled: {}", e)))?
    }

    /// Shut down the render worker.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("close canceled: {}", e)))?
    }

    fn schedule_render(&self) {
        let params = RenderParams::compute(&self.words, &self.settings, self.canvas);
        // Best effort: a dead worker surfaces on the next export.
        let _ = self.cmd_tx.send(Command::Render(params));
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Other("render worker is gone".to_string()))
    }
}

fn flush(renderer: &mut Renderer, surface: &mut Surface, pending: &mut Option<RenderParams>) {
    if let Some(params) = pending.take() {
        if let Err(e) = renderer.render(surface, &params) {
            warn!("render pass failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> StudioConfig {
        StudioConfig {
            canvas: CanvasSize {
                width: 32,
                height: 32,
            },
            settle: Duration::from_millis(5),
            ..Default::default()
        }
    }

    #[test]
    fn studio_starts_with_seed_state() {
        let studio = Studio::new(quick_config(), None).unwrap();
        assert_eq!(studio.words(), &WordList::seed());
        assert_eq!(studio.settings(), &StyleSettings::default());
    }

    #[test]
    fn mutations_apply_pure_model_transitions() {
        let mut studio = Studio::new(quick_config(), None).unwrap();
        let before = studio.words().len();

        studio.add_word("测试", 3.0);
        assert_eq!(studio.words().len(), before + 1);
        assert_eq!(studio.words().words()[0].text, "测试");

        studio.add_word("   ", 3.0);
        assert_eq!(studio.words().len(), before + 1);

        let id = studio.words().words()[0].id.clone();
        studio.update_weight(&id, 9.0);
        assert_eq!(studio.words().get(&id).map(|w| w.weight), Some(9.0));

        studio.remove_word(&id);
        assert_eq!(studio.words().len(), before);

        studio.update_style(StyleUpdate {
            is_transparent: Some(true),
            ..Default::default()
        });
        assert!(studio.settings().is_transparent);
    }

    #[tokio::test]
    async fn export_works_without_a_backend() {
        let studio = Studio::new(quick_config(), None).unwrap();
        let png = studio.export_png().await.unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
        let url = studio.export_data_url().await.unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        studio.close().await.unwrap();
    }
}
