use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Parser};
use gifsheet_core::{ResizeFilter, SpriteConfig, convert_animation, extract};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "gifsheet",
    about = "Convert an animated image into a spritesheet",
    version,
    author
)]
struct Cli {
    // Input/Output
    /// Animated image (GIF, APNG or WebP)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output PNG path (defaults to the input name with a .png extension)
    #[arg(short, long, help_heading = "Input/Output")]
    output: Option<PathBuf>,
    /// YAML config file path (its fields override the layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Layout
    /// Tile width in pixels
    #[arg(long, default_value_t = 64, allow_negative_numbers = true, help_heading = "Layout")]
    tile_width: i64,
    /// Tile height in pixels
    #[arg(long, default_value_t = 64, allow_negative_numbers = true, help_heading = "Layout")]
    tile_height: i64,
    /// Number of frames to place (defaults to every decoded frame)
    #[arg(long, allow_negative_numbers = true, help_heading = "Layout")]
    frames: Option<i64>,
    /// Pixels between tiles
    #[arg(long, default_value_t = 5, allow_negative_numbers = true, help_heading = "Layout")]
    margin: i64,
    /// Resize filter: nearest | bilinear | bicubic | gaussian | lanczos3
    #[arg(long, default_value = "bicubic", help_heading = "Layout")]
    filter: String,

    // Export
    /// Write JSON (hash) tile metadata to this file
    #[arg(long, help_heading = "Export")]
    metadata: Option<PathBuf>,
    /// Export sheet stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit: json | yaml
    #[arg(long, value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config: Option<String>,
    /// Dry run: build the sheet and report stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
}

/// Optional overrides loaded from `--config`.
#[derive(Debug, Default, Deserialize)]
struct YamlConfig {
    tile_width: Option<i64>,
    tile_height: Option<i64>,
    frame_count: Option<i64>,
    margin: Option<i64>,
    filter: Option<String>,
}

/// Layout values as typed by the user, before validation.
#[derive(Debug, Clone)]
struct RawLayout {
    tile_width: i64,
    tile_height: i64,
    frame_count: Option<i64>,
    margin: i64,
    filter: String,
}

impl YamlConfig {
    fn apply(self, mut raw: RawLayout) -> RawLayout {
        if let Some(v) = self.tile_width {
            raw.tile_width = v;
        }
        if let Some(v) = self.tile_height {
            raw.tile_height = v;
        }
        if let Some(v) = self.frame_count {
            raw.frame_count = Some(v);
        }
        if let Some(v) = self.margin {
            raw.margin = v;
        }
        if let Some(v) = self.filter {
            raw.filter = v;
        }
        raw
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    run(&cli)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut raw = RawLayout {
        tile_width: cli.tile_width,
        tile_height: cli.tile_height,
        frame_count: cli.frames,
        margin: cli.margin,
        filter: cli.filter.clone(),
    };
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        raw = y.apply(raw);
    }
    let filter = parse_filter(&raw.filter)?;

    let start = Instant::now();
    let bytes =
        fs::read(&cli.input).with_context(|| format!("read {}", cli.input.display()))?;
    let animation =
        extract(&bytes).with_context(|| format!("decode {}", cli.input.display()))?;
    info!(
        frames = animation.len(),
        width = animation.width,
        height = animation.height,
        "decoded input"
    );

    let frame_count = raw.frame_count.unwrap_or(animation.len() as i64);
    let mut cfg = SpriteConfig::from_raw(raw.tile_width, raw.tile_height, frame_count, raw.margin)?;
    cfg.filter = filter;

    if let Some(format) = &cli.print_config {
        match format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let sheet = convert_animation(&animation, &cfg)?;
    let stats = sheet.stats();
    info!(
        width = sheet.width(),
        height = sheet.height(),
        columns = stats.columns,
        rows = stats.rows,
        tiles = stats.tiles_placed,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        elapsed = fmt_dur(start.elapsed()),
        "sheet built"
    );
    if stats.discarded_frames > 0 {
        warn!(
            discarded = stats.discarded_frames,
            "frames beyond --frames were not placed"
        );
    }

    if cli.dry_run {
        println!("{}", stats.summary());
        return Ok(());
    }

    let png_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("png"));
    if png_path == cli.input {
        anyhow::bail!(
            "output {} would overwrite the input; pass --output",
            png_path.display()
        );
    }
    sheet
        .image
        .save_with_format(&png_path, image::ImageFormat::Png)
        .with_context(|| format!("write {}", png_path.display()))?;
    info!(?png_path, "sheet written");

    if let Some(json_path) = &cli.metadata {
        let json_value = gifsheet_core::to_json_hash(&sheet, &file_name(&png_path));
        let json = serde_json::to_string_pretty(&json_value)?;
        fs::write(json_path, json).with_context(|| format!("write {}", json_path.display()))?;
        info!(?json_path, "metadata written");
    }

    if let Some(stats_path) = &cli.export_stats {
        fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("write {}", stats_path.display()))?;
        info!(?stats_path, "stats exported");
    }
    Ok(())
}

fn parse_filter(s: &str) -> anyhow::Result<ResizeFilter> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown resize filter: {}", s))
}

fn file_name(p: &Path) -> String {
    p.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.to_string_lossy().into_owned())
}

fn fmt_dur(d: std::time::Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms < 1000.0 {
        format!("{:.1} ms", ms)
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
