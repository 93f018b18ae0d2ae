use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "warpmask", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Warp a design onto a background and write the flattened composite.
    Blend(BlendArgs),
    /// Rasterize mask paths into a binary PNG.
    Mask(MaskArgs),
    /// Export the source/mask pair for an outpaint frame.
    Outpaint(OutpaintArgs),
}

#[derive(Parser, Debug)]
struct BlendArgs {
    /// Background image.
    #[arg(long)]
    background: PathBuf,

    /// Design image.
    #[arg(long)]
    design: PathBuf,

    /// Corners JSON (`{"tl":{"x":..,"y":..},...}`) in background pixels. Omit to auto-center.
    #[arg(long)]
    corners: Option<PathBuf>,

    /// Design opacity in [0, 1].
    #[arg(long)]
    opacity: Option<f32>,

    /// Apply a mirror to the placed design.
    #[arg(long, value_enum)]
    flip: Option<Flip>,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Flip {
    Horizontal,
    Vertical,
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Mask width in pixels.
    #[arg(long)]
    width: u32,

    /// Mask height in pixels.
    #[arg(long)]
    height: u32,

    /// JSON array of paths, or a history record carrying `paths`.
    #[arg(long)]
    paths: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct OutpaintArgs {
    /// Source image.
    #[arg(long)]
    image: PathBuf,

    /// History record JSON with `outpaintFrame` and `imagePos`.
    #[arg(long)]
    frame: PathBuf,

    /// Output PNG for the placed source.
    #[arg(long)]
    out_source: PathBuf,

    /// Output PNG for the outpaint mask.
    #[arg(long)]
    out_mask: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Blend(args) => cmd_blend(args),
        Command::Mask(args) => cmd_mask(args),
        Command::Outpaint(args) => cmd_outpaint(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<warpmask::EditorConfig> {
    let config = match path {
        Some(p) => warpmask::EditorConfig::from_path(p)?,
        None => warpmask::EditorConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

fn read_image(path: &Path, max_bytes: usize) -> anyhow::Result<warpmask::PreparedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let image = warpmask::load_image(&bytes, mime_for(path), max_bytes)
        .with_context(|| format!("load image '{}'", path.display()))?;
    Ok(image)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {what} '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {what} JSON"))
}

fn write_png(path: &Path, png: &warpmask::EncodedImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, &png.bytes).with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_blend(args: BlendArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let background = read_image(&args.background, config.max_image_bytes)?;
    let design = read_image(&args.design, config.max_image_bytes)?;

    let mut compositor = warpmask::Compositor::from_config(&config, warpmask::NullSink);
    compositor.set_background(background);
    compositor.set_design(design);
    if let Some(path) = &args.corners {
        let corners: warpmask::Corners = read_json(path, "corners")?;
        compositor.set_corners(Some(corners));
    }
    if let Some(opacity) = args.opacity {
        compositor.set_opacity(opacity);
    }
    match args.flip {
        Some(Flip::Horizontal) => compositor.flip_horizontal(),
        Some(Flip::Vertical) => compositor.flip_vertical(),
        None => {}
    }

    let frame = compositor
        .composite()?
        .context("nothing to composite: background missing")?;
    write_png(&args.out, &frame.to_png()?)
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    let value: serde_json::Value = read_json(&args.paths, "paths")?;
    let paths: Vec<warpmask::Path> = if value.is_array() {
        serde_json::from_value(value).context("parse path list")?
    } else {
        serde_json::from_value::<warpmask::HistoryRecord>(value)
            .context("parse history record")?
            .paths
    };

    let surface = warpmask::Canvas::new(args.width, args.height);
    let mask = match warpmask::rasterize_mask(&paths, surface)? {
        Some(mask) => mask,
        None => warpmask::MaskImage {
            width: args.width,
            height: args.height,
            data: vec![0; args.width as usize * args.height as usize],
        },
    };
    tracing::debug!(paths = paths.len(), white = mask.white_count(), "mask rasterized");
    write_png(&args.out, &mask.to_png()?)
}

fn cmd_outpaint(args: OutpaintArgs) -> anyhow::Result<()> {
    let config = load_config(None)?;
    let source = read_image(&args.image, config.max_image_bytes)?;
    let record = warpmask::HistoryRecord::from_path(&args.frame)?;
    let (frame, image_pos) = record
        .outpaint_layout()
        .context("frame file needs both outpaintFrame and imagePos")?;

    let mut editor = warpmask::OutpaintEditor::with_layout(source, frame, image_pos);
    let (source_png, mask_png) = editor.export()?.encode()?;
    write_png(&args.out_source, &source_png)?;
    write_png(&args.out_mask, &mask_png)
}
