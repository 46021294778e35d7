use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tilemark::config::WatermarkConfig;
use tilemark::job::watermark_file;
use tilemark::logging::{init_subscriber, LogFormat};

/// Tilemark - tile a rotated, semi-transparent text watermark over an image
#[derive(Parser, Debug)]
#[command(name = "tilemark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Image to watermark
    input: Option<PathBuf>,

    /// Output path (default: <stem>_watermark<.ext> next to the input)
    output: Option<PathBuf>,

    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Watermark text
    #[arg(short, long)]
    text: Option<String>,

    /// Keep the source orientation
    #[arg(long, conflicts_with = "rotate")]
    no_rotate: bool,

    /// Rotate the source counter-clockwise by this many degrees first
    #[arg(long, value_name = "DEG", allow_negative_numbers = true)]
    rotate: Option<f32>,

    /// Font size in pixels (default: shorter side / 25)
    #[arg(long, value_name = "PX")]
    font_size: Option<u32>,

    /// Fill colour as #RGB, #RRGGBB or #RRGGBBAA
    #[arg(long, value_name = "HEX")]
    color: Option<String>,

    /// Tile rotation in degrees counter-clockwise
    #[arg(long, value_name = "DEG", allow_negative_numbers = true)]
    angle: Option<f32>,

    /// Font file to try before the configured ones (repeatable)
    #[arg(long = "font", value_name = "PATH")]
    fonts: Vec<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u8>,

    /// Output resolution in dots per inch
    #[arg(long)]
    dpi: Option<u16>,

    /// Log output format: text or json
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

fn load_config(args: &Args) -> anyhow::Result<WatermarkConfig> {
    let mut config = match &args.config {
        Some(path) => WatermarkConfig::from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => WatermarkConfig::default(),
    };

    if let Some(text) = &args.text {
        config.text = text.clone();
    }
    if args.no_rotate {
        config.pre_rotate_degrees = 0.0;
    }
    if let Some(degrees) = args.rotate {
        config.pre_rotate_degrees = degrees;
    }
    if let Some(size) = args.font_size {
        config.font_size = Some(size);
    }
    if let Some(color) = &args.color {
        config.fill_color = color.clone();
    }
    if let Some(angle) = args.angle {
        config.tile_rotation_degrees = angle;
    }
    if !args.fonts.is_empty() {
        let mut paths = args.fonts.clone();
        paths.append(&mut config.font_paths);
        config.font_paths = paths;
    }
    if let Some(quality) = args.quality {
        config.output_quality = quality;
    }
    if let Some(dpi) = args.dpi {
        config.output_dpi = dpi;
    }

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid watermark configuration")?;

    Ok(config)
}

fn print_banner() {
    println!("{}", "=".repeat(50));
    println!("Tilemark - document watermarking tool");
    println!("{}", "=".repeat(50));
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_subscriber(args.log_format) {
        eprintln!("Failed to initialize logging subsystem: {}", e);
        return ExitCode::FAILURE;
    }

    print_banner();

    let Some(input) = args.input.clone() else {
        println!();
        if let Err(e) = Args::command().print_help() {
            eprintln!("{}", e);
        }
        println!();
        println!("Examples:");
        println!("  tilemark id_card.jpg");
        println!("  tilemark id_card.jpg id_card_with_watermark.jpg");
        return ExitCode::from(2);
    };

    if !input.exists() {
        println!("✗ Error: File does not exist '{}'", input.display());
        return ExitCode::FAILURE;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            println!("✗ Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match watermark_file(&input, args.output.as_deref(), &config) {
        Ok(report) => {
            if report.font_fallback {
                println!("Warning: no usable font found, using the built-in bitmap font");
            }
            println!("✓ Watermark added");
            println!("  Input:  {}", report.input.display());
            println!("  Output: {}", report.output.display());
            println!();
            println!("✓ Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(input = %input.display(), error = %e, "Watermarking failed");
            println!("✗ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
