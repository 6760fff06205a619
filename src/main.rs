use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mapmatte::batch::{run_batch, BatchConfig, LogReporter};

/// Cut the map out of game screenshots and save it with a transparent background.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// YAML configuration file [default: config.yaml next to the executable,
    /// built-in defaults when that file does not exist]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the screenshots
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory receiving the extracted maps
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of color clusters
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Mask values above this become opaque (0-255)
    #[arg(short, long)]
    alpha_threshold: Option<u8>,

    /// Flatten lighting before clustering
    #[arg(short, long)]
    flatten: bool,

    /// Luminance used by --flatten (0-255)
    #[arg(short, long)]
    target_luminance: Option<u8>,

    /// Only print the final statistics
    #[arg(short, long)]
    quiet: bool,
}

fn load_config(args: &Args) -> Result<BatchConfig> {
    let mut config = match &args.config {
        Some(path) => BatchConfig::load(path)?,
        None => BatchConfig::load_or_default(&BatchConfig::default_path())?,
    };

    if let Some(input) = &args.input {
        config.paths.input_dir = input.clone();
    }
    if let Some(output) = &args.output {
        config.paths.output_dir = output.clone();
    }
    if let Some(clusters) = args.clusters {
        config.processing.kmeans_clusters = clusters;
    }
    if let Some(threshold) = args.alpha_threshold {
        config.processing.alpha_threshold = threshold;
    }
    if args.flatten {
        config.flatten_colors.enabled = true;
    }
    if let Some(luminance) = args.target_luminance {
        config.flatten_colors.target_luminance = luminance;
    }
    if args.quiet {
        config.logging.show_progress = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let reporter = LogReporter {
        show_progress: config.logging.show_progress,
        show_stats: config.logging.show_stats,
    };

    run_batch(&config, &reporter).with_context(|| {
        format!(
            "batch aborted while processing {}",
            config.paths.input_dir.display()
        )
    })?;
    Ok(())
}
