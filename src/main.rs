// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use photobooth::config::{Config, log_file_path};
use photobooth::filters::FilterType;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "photobooth")]
#[command(about = "Photo booth for the terminal: three shots, one film strip")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive booth (default)
    Terminal {
        /// Use a synthetic test card instead of a webcam
        #[arg(long)]
        synthetic: bool,

        /// Camera index to use (from 'photobooth list')
        #[arg(short, long)]
        camera: Option<usize>,
    },

    /// List available cameras
    List,

    /// List the filter catalog
    Filters,

    /// Capture a strip without the UI, one photo per filter
    Strip {
        /// Filters in capture order
        #[arg(
            short,
            long,
            value_enum,
            value_delimiter = ',',
            default_value = "normal,mono,sepia"
        )]
        filters: Vec<FilterType>,

        /// Use a synthetic test card instead of a webcam
        #[arg(long)]
        synthetic: bool,

        /// Camera index to use (from 'photobooth list')
        #[arg(short, long)]
        camera: Option<usize>,

        /// Directory for the strip (default: ~/Pictures/photobooth)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hand the strip to the desktop instead of only saving it
        #[arg(long)]
        share: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Terminal mode owns the screen, so its logs go to a file
    let interactive = matches!(cli.command, None | Some(Commands::Terminal { .. }));
    init_logging(interactive)?;

    let mut config = Config::load();

    match cli.command {
        None => cli::run_terminal(config, false),
        Some(Commands::Terminal { synthetic, camera }) => {
            if let Some(camera) = camera {
                config.camera_index = camera;
            }
            cli::run_terminal(config, synthetic)
        }
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Filters) => cli::list_filters(),
        Some(Commands::Strip {
            filters,
            synthetic,
            camera,
            output,
            share,
        }) => {
            if let Some(camera) = camera {
                config.camera_index = camera;
            }
            if let Some(output) = output {
                config.export_dir = output;
            }
            cli::capture_strip(config, filters, synthetic, share)
        }
        Some(Commands::Config { init }) => cli::show_config(&config, init),
    }
}

/// Initialize logging
///
/// Set RUST_LOG environment variable to control log level.
/// Examples: RUST_LOG=debug, RUST_LOG=photobooth=debug, RUST_LOG=info
fn init_logging(to_file: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    if to_file {
        let path = log_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .init();
    }
    Ok(())
}
