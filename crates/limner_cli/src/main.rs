//! limner CLI
//!
//! Rasterize SVG documents to PNG and inspect their geometry.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use limner_core::{Affine2D, Color, IntSize, Rect};
use limner_svg::{FitTo, ResvgEngine, SvgRenderer};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::Overrides;

#[derive(Parser)]
#[command(name = "limner")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SVG rasterizer and inspector", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an SVG document to a PNG file
    Render {
        /// Input .svg or .svgz file
        input: PathBuf,

        /// Output PNG file
        output: PathBuf,

        /// Output size as WIDTHxHEIGHT (overrides any fit mode)
        #[arg(short, long, value_parser = config::parse_size)]
        size: Option<IntSize>,

        /// TOML file with render options
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Device scale factor (dpi = 96 * scale)
        #[arg(long)]
        dpi_scale: Option<f32>,

        /// Fill the background with a #rrggbb[aa] color
        #[arg(short, long, value_parser = config::parse_color)]
        background: Option<Color>,

        /// Scale to a width, keeping aspect ratio
        #[arg(long, conflicts_with_all = ["fit_height", "zoom"])]
        fit_width: Option<u32>,

        /// Scale to a height, keeping aspect ratio
        #[arg(long, conflicts_with = "zoom")]
        fit_height: Option<u32>,

        /// Scale both dimensions by a factor
        #[arg(long)]
        zoom: Option<f32>,
    },

    /// Print size, view box and element geometry of an SVG document
    Info {
        /// Input .svg or .svgz file
        input: PathBuf,

        /// Element ids to query
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Render {
            input,
            output,
            size,
            options,
            dpi_scale,
            background,
            fit_width,
            fit_height,
            zoom,
        } => {
            let fit_to = match (fit_width, fit_height, zoom) {
                (Some(width), _, _) => Some(FitTo::Width(width)),
                (_, Some(height), _) => Some(FitTo::Height(height)),
                (_, _, Some(zoom)) => Some(FitTo::Zoom(zoom)),
                _ => None,
            };
            let overrides = Overrides {
                dpi_scale,
                background,
                fit_to,
            };
            cmd_render(&input, &output, size, options.as_deref(), &overrides)
        }

        Commands::Info { input, ids, json } => cmd_info(&input, &ids, json),
    }
}

fn cmd_render(
    input: &Path,
    output: &Path,
    size: Option<IntSize>,
    options_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<()> {
    let mut options = config::load_options(options_path)?;
    config::apply_overrides(&mut options, overrides);
    let scale = config::scale_factor(&options, overrides);

    let mut renderer = SvgRenderer::with_engine(ResvgEngine::with_defaults(options));
    renderer.set_device_pixel_ratio(scale);
    renderer
        .load_file(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    if renderer.is_empty() {
        warn!("{} has nothing to render", input.display());
    }

    let size = match size {
        Some(size) => size,
        None => renderer
            .fitted_size()
            .with_context(|| format!("{} has no usable size", input.display()))?,
    };

    let image = renderer.render_to_image(Some(size));
    let png = limner_paint::encode_png(&image).context("Failed to encode PNG")?;
    fs::write(output, png).with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Rendered {} to {} ({}x{})",
        input.display(),
        output.display(),
        size.width,
        size.height
    );
    Ok(())
}

fn cmd_info(input: &Path, ids: &[String], as_json: bool) -> Result<()> {
    let mut renderer = SvgRenderer::new();
    renderer
        .load_file(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let size = renderer.default_size();
    let view_box = renderer.view_box_f();
    let bbox = renderer.bounding_box();

    if as_json {
        let elements: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "exists": renderer.element_exists(id),
                    "bounds": rect_json(renderer.bounds_on_element(id)),
                    "transform": renderer.transform_for_element(id).elements,
                })
            })
            .collect();

        let report = json!({
            "path": input.display().to_string(),
            "size": [size.width, size.height],
            "view_box": rect_json(view_box),
            "bounding_box": rect_json(bbox),
            "empty": renderer.is_empty(),
            "elements": elements,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", input.display());
    println!("  size:         {}x{}", size.width, size.height);
    println!("  view box:     {}", format_rect(view_box));
    println!("  bounding box: {}", format_rect(bbox));
    println!("  empty:        {}", renderer.is_empty());

    for id in ids {
        println!();
        if !renderer.element_exists(id) {
            println!("  #{}: not found", id);
            continue;
        }
        println!("  #{}", id);
        println!("    bounds:    {}", format_rect(renderer.bounds_on_element(id)));
        println!(
            "    transform: {}",
            format_transform(renderer.transform_for_element(id))
        );
    }

    Ok(())
}

fn rect_json(rect: Rect) -> serde_json::Value {
    json!([rect.x(), rect.y(), rect.width(), rect.height()])
}

fn format_rect(rect: Rect) -> String {
    format!(
        "x={} y={} w={} h={}",
        rect.x(),
        rect.y(),
        rect.width(),
        rect.height()
    )
}

fn format_transform(transform: Affine2D) -> String {
    let [a, b, c, d, e, f] = transform.elements;
    format!("matrix({} {} {} {} {} {})", a, b, c, d, e, f)
}
