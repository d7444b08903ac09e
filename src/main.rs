use anyhow::{bail, Context};
use bytes::Bytes;
use clap::Parser;
use grapemark::config::Config;
use grapemark::export::{BatchExporter, DirectorySink, ExportService, TracingNotifier};
use grapemark::preview::PreviewController;
use grapemark::watermark::{Color, OptionsPatch};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Grapemark - stamp a tiled text watermark over images
#[derive(Parser, Debug)]
#[command(name = "grapemark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Images to watermark, in export order
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides export.output_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export every image into one ZIP archive
    #[arg(short, long)]
    all: bool,

    /// Export this image instead of the last loaded one
    #[arg(short, long, value_name = "NAME")]
    select: Option<String>,

    /// Drop an image from the list before exporting (repeatable)
    #[arg(long, value_name = "NAME")]
    remove: Vec<String>,

    /// Watermark text
    #[arg(long)]
    text: Option<String>,

    /// Fill color as #RGB, #RGBA, #RRGGBB or #RRGGBBAA
    #[arg(long)]
    color: Option<Color>,

    /// Font size in pixels [12, 64]
    #[arg(long)]
    font_size: Option<f32>,

    /// Clockwise rotation in degrees [0, 45]
    #[arg(long)]
    rotate: Option<f32>,

    /// Horizontal tile period in pixels [100, 560]
    #[arg(long)]
    tile_width: Option<f32>,

    /// Vertical tile period in pixels [100, 360]
    #[arg(long)]
    tile_height: Option<f32>,
}

impl Args {
    fn options_patch(&self) -> OptionsPatch {
        OptionsPatch {
            text: self.text.clone(),
            fill_color: self.color,
            font_size: self.font_size,
            rotation_degrees: self.rotate,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(output) = &args.output {
        config.export.output_dir = output.clone();
    }
    config.validate().context("Configuration is invalid")?;

    grapemark::logging::init_subscriber(&config.logging);

    let patch = config.watermark.clone().merge(args.options_patch());
    let mut controller = PreviewController::new(config.preview_settings());
    controller.apply_patch(&patch);
    tracing::info!(
        images = args.images.len(),
        output_dir = %config.export.output_dir.display(),
        options = ?controller.options(),
        "Configuration loaded successfully"
    );

    for path in &args.images {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        // Decode failures stay in the list as failed entries
        if let Err(e) = controller.add_image(display_name(path), Bytes::from(bytes)) {
            tracing::warn!(path = %path.display(), error = %e, "Image not loaded");
        }
    }

    for name in &args.remove {
        let id = match controller.images().find_by_name(name) {
            Some(entry) => entry.id(),
            None => bail!("No image named '{}' to remove", name),
        };
        controller.remove_image(id)?;
    }

    if let Some(name) = &args.select {
        let id = match controller.images().find_by_name(name) {
            Some(entry) => entry.id(),
            None => bail!("No image named '{}' to select", name),
        };
        controller.select(id)?;
    }

    let service = ExportService::new(
        Arc::new(DirectorySink::new(&config.export.output_dir)),
        Arc::new(TracingNotifier),
        BatchExporter::new(config.export.archive_prefix.clone()),
    );

    let report = if args.all {
        service.export_all(&mut controller).await
    } else {
        service.export_current(&controller).await
    }?;

    println!(
        "{}",
        config.export.output_dir.join(&report.file_name).display()
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
