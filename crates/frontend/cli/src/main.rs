use anyhow::{Context, Result};
use clap::Parser;
use raster_core::graphics::Rgb;
use raster_core::logging::{LogCategory, LogConfig, LogLevel};
use raster_core::renderer::{Renderer, SoftwareRenderer};
use raster_core::types::Frame;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

mod scene;

use scene::Scene;

/// Render one frame of screen-space triangles to a PNG
#[derive(Parser)]
#[command(name = "rasterize")]
struct Args {
    /// Scene description (JSON)
    scene: PathBuf,

    /// Where to write the PNG
    #[arg(short, long, default_value = "frame.png")]
    output: PathBuf,

    /// Override the scene width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Override the scene height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Override the background: a name, #rrggbb or 0xrrggbb
    #[arg(long, value_parser = scene::parse_color)]
    background: Option<Rgb>,

    /// Reject triangles with non-finite or out-of-range vertices instead of drawing them
    #[arg(long, default_value_t = false)]
    checked: bool,

    /// Global log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: LogLevel,

    /// Log level for rasterizer messages, defaults to --log-level
    #[arg(long)]
    log_raster: Option<LogLevel>,

    /// Log level for buffer messages, defaults to --log-level
    #[arg(long)]
    log_buffer: Option<LogLevel>,

    /// Print frame statistics to stdout
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn init_logging(args: &Args) {
    let config = LogConfig::global();
    config.set_global_level(args.log_level);
    if let Some(level) = args.log_raster {
        config.set_level(LogCategory::Raster, level);
    }
    if let Some(level) = args.log_buffer {
        config.set_level(LogCategory::Buffer, level);
    }

    // The backend must let through the most verbose category; RUST_LOG can still narrow it
    let loudest = [Some(args.log_level), args.log_raster, args.log_buffer]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(LogLevel::Warn);
    env_logger::Builder::new()
        .filter_level(loudest.to_level_filter())
        .parse_default_env()
        .init();
}

fn write_png(path: &Path, frame: &Frame) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&frame.pixels)?;
    writer.finish()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let scene = Scene::load(&args.scene)?;
    let width = args.width.unwrap_or_else(|| scene.width());
    let height = args.height.unwrap_or_else(|| scene.height());
    let background = args.background.unwrap_or_else(|| scene.background());
    if width == 0 || height == 0 {
        anyhow::bail!("Frame must be at least 1x1, got {}x{}", width, height);
    }
    if scene.triangles.is_empty() {
        log::warn!("{} has no triangles, writing a plain background", args.scene.display());
    }

    let mut renderer = SoftwareRenderer::new(width, height).with_validation(args.checked);
    log::info!(
        "{}: {} triangles at {}x{}",
        renderer.name(),
        scene.triangles.len(),
        width,
        height
    );

    renderer.begin_frame(background);
    renderer.draw_triangles(&scene.triangles);
    let stats = renderer.stats();

    write_png(&args.output, renderer.get_frame())?;

    if args.stats {
        println!("Frame {}x{} -> {}", width, height, args.output.display());
        println!("  triangles submitted: {}", stats.submitted);
        println!("  triangles rejected:  {}", stats.rejected);
        println!("  triangles empty:     {}", stats.empty);
        println!("  pixels written:      {}", stats.pixels_written);
    }

    Ok(())
}
