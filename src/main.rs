use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use lightcloud::surface::export_file_name;
use lightcloud::{
    now_millis, CanvasSize, IdGen, LayoutMode, RenderParams, Renderer, StyleSettings, StyleUpdate,
    Surface, Word, WordList,
};

#[derive(Parser)]
#[command(name = "lightcloud", version, about = "2D word-cloud authoring engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the word cloud once and write it as a PNG file
    Render(RenderArgs),
    /// Ask the generation service for keywords on a topic
    #[cfg(feature = "suggest")]
    Suggest(SuggestArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// JSON word list ([{"text": "...", "weight": 3}, ...]); the
    /// built-in starter list is used when omitted
    #[arg(long)]
    words: Option<PathBuf>,
    /// Output path; defaults to a timestamped file name
    #[arg(long)]
    out: Option<PathBuf>,
    /// Layout mode: uniform, radial, or compact
    #[arg(long)]
    layout: Option<LayoutMode>,
    /// Palette index into the fixed catalog
    #[arg(long)]
    palette: Option<usize>,
    /// Font family for the cloud text
    #[arg(long)]
    font: Option<String>,
    /// Hex background color
    #[arg(long)]
    background: Option<String>,
    /// Render on a transparent background
    #[arg(long)]
    transparent: bool,
    /// Fraction of words eligible for rotation, 0..=1
    #[arg(long)]
    rotation: Option<f32>,
    /// Lower font size bound
    #[arg(long)]
    min_size: Option<u32>,
    /// Upper font size bound
    #[arg(long)]
    max_size: Option<u32>,
    /// Fail when no word-cloud backend is installed instead of writing
    /// a background-only image
    #[arg(long)]
    strict: bool,
}

#[cfg(feature = "suggest")]
#[derive(Args)]
struct SuggestArgs {
    /// Topic to generate keywords for
    #[arg(long)]
    topic: String,
    /// Write the word list JSON here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => run_render(args),
        #[cfg(feature = "suggest")]
        Commands::Suggest(args) => run_suggest(args),
    }
}

fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let words = match &args.words {
        Some(path) => load_words(path)?,
        None => WordList::seed(),
    };

    let settings = StyleSettings::default().update(StyleUpdate {
        font_family: args.font,
        background_color: args.background,
        is_transparent: args.transparent.then_some(true),
        color_palette: args.palette.map(lightcloud::style::palette),
        rotation_ratio: args.rotation,
        min_font_size: args.min_size,
        max_font_size: args.max_size,
        layout: args.layout,
    });

    let canvas = CanvasSize::default();
    let mut surface = Surface::new(canvas)?;
    // No layout backend ships with the CLI; library embedders inject one.
    let mut renderer = Renderer::unavailable();
    if args.strict {
        renderer.ensure_available()?;
    }

    let params = RenderParams::compute(&words, &settings, canvas);
    renderer.render(&mut surface, &params)?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(export_file_name(now_millis())));
    fs::write(&out, surface.export_png()?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("wrote {} ({} words)", out.display(), words.len());
    Ok(())
}

#[cfg(feature = "suggest")]
fn run_suggest(args: SuggestArgs) -> anyhow::Result<()> {
    use lightcloud::{SuggestConfig, SuggestionClient};

    let client = SuggestionClient::new(SuggestConfig::from_env()?)?;
    let words = client.suggest(&args.topic)?;
    let json = serde_json::to_string_pretty(&words)?;
    match args.out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {} keywords to {}", words.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Word-list file entries; ids are optional and generated when absent.
#[derive(serde::Deserialize)]
struct WordEntry {
    #[serde(default)]
    id: Option<String>,
    text: String,
    weight: f32,
}

fn load_words(path: &Path) -> anyhow::Result<WordList> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let entries: Vec<WordEntry> =
        serde_json::from_str(&data).with_context(|| format!("invalid word list in {}", path.display()))?;

    let mut ids = IdGen::new();
    let mut words = Vec::new();
    for entry in entries {
        let text = entry.text.trim().to_string();
        if text.is_empty() {
            continue;
        }
        words.push(Word {
            id: entry.id.unwrap_or_else(|| ids.fresh()),
            text,
            weight: entry.weight,
        });
    }
    Ok(WordList::from_words(words))
}
