use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use framesmith::{DirectoryDownloads, OutputFormat, Studio, StudioConfig, TextLayoutMode};

#[derive(Parser, Debug)]
#[command(name = "framesmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the frame catalog.
    Frames(FramesArgs),
    /// Compose text over a frame and export the result.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Studio config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Studio config JSON. Relative paths inside it resolve against its directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory frame image locators resolve against.
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Frame id to compose over.
    #[arg(long)]
    frame: Option<String>,

    /// Caption text.
    #[arg(long)]
    text: Option<String>,

    /// Font size in pixels (e.g. `32` or `32px`).
    #[arg(long)]
    font_size: Option<String>,

    /// Text color as hex (`#RGB`, `#RRGGBB`, `#RRGGBBAA`).
    #[arg(long)]
    font_color: Option<String>,

    /// Background color as hex.
    #[arg(long)]
    background: Option<String>,

    /// Text block left edge in pixels.
    #[arg(long)]
    x: Option<f64>,

    /// Text block top edge in pixels.
    #[arg(long)]
    y: Option<f64>,

    /// Export format: png or jpeg.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Text placement: anchored or centered-wrap.
    #[arg(long)]
    layout: Option<TextLayoutMode>,

    /// Font file for the caption.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Directory receiving `exported-image.<ext>`.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// How long to wait for the frame image.
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<(StudioConfig, PathBuf)> {
    match path {
        Some(p) => {
            let cfg = StudioConfig::from_path(p)
                .with_context(|| format!("load config '{}'", p.display()))?;
            let base = p.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            Ok((cfg, base))
        }
        None => Ok((StudioConfig::default(), PathBuf::from("."))),
    }
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (cfg, _) = load_config(args.config.as_deref())?;
    for frame in cfg.catalog()?.iter() {
        println!("{}\t{}\t{}", frame.id, frame.display_name, frame.image_ref);
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (mut cfg, base) = load_config(args.config.as_deref())?;
    if let Some(root) = args.assets_root {
        cfg.assets_root = root;
    }
    if let Some(font) = args.font {
        cfg.font_path = Some(font);
    }
    if let Some(frame) = args.frame {
        cfg.initial.frame = Some(frame);
    }
    cfg.validate()?;

    let mut studio = Studio::from_config(&cfg, &base)?;

    if let Some(text) = args.text {
        studio.set_text(text);
    }
    if let Some(size) = &args.font_size {
        studio.set_font_size(size);
    }
    if let Some(c) = &args.font_color {
        studio.set_font_color(c);
    }
    if let Some(c) = &args.background {
        studio.set_background_color(c);
    }
    if args.x.is_some() || args.y.is_some() {
        let cur = studio.state().text_position;
        studio.set_text_position(args.x.unwrap_or(cur.x), args.y.unwrap_or(cur.y));
    }
    if let Some(layout) = args.layout {
        studio.set_text_layout(layout);
    }
    if let Some(format) = args.format {
        studio.set_output_format(format);
    }

    let timeout = Duration::from_millis(args.timeout_ms);
    let applied = studio.wait_for_frame(timeout);

    for notice in studio.take_notices() {
        eprintln!("warning: {}", notice.message);
    }
    if !applied {
        anyhow::bail!(
            "frame image for '{}' was not applied within {timeout:?}",
            studio
                .selected_frame()
                .map(|f| f.id.as_str())
                .unwrap_or("<none>")
        );
    }
    if !studio.can_export() {
        anyhow::bail!("nothing to export: text is empty (pass --text)");
    }

    let mut downloads = DirectoryDownloads::new(&args.out_dir);
    let file = studio.export(&mut downloads)?;
    let out = downloads
        .last_saved()
        .map(|p| p.display().to_string())
        .unwrap_or(file.file_name);
    eprintln!("wrote {out}");
    Ok(())
}
