mod display;
mod input;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use phasmo_core::{MonitorConfig, Monitor, ShutdownSignal, SystemProcessProvider, load_definitions};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::display::Dashboard;

/// Library logs stay off unless `RUST_LOG` enables them, so they do not
/// draw over the dashboard.
const DEFAULT_LOG_DIRECTIVE: &str = "phasmowatch=info";

#[derive(Parser)]
#[command(name = "phasmowatch", version)]
#[command(about = "Reads the current ghost type from Phasmophobia's memory")]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "PHASMOWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Target process name (overrides config)
    #[arg(short, long)]
    process: Option<String>,

    /// Seconds between refreshes (overrides config)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Cheat table with the pointer chains (overrides config)
    #[arg(long)]
    pointers: Option<PathBuf>,

    /// Append output instead of redrawing the screen
    #[arg(long)]
    no_clear: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(DEFAULT_LOG_DIRECTIVE.parse()?))
        .init();

    let args = Args::parse();
    let config = build_config(&args);

    let definitions = match load_definitions(&config.definitions_path) {
        Ok(definitions) => definitions,
        Err(e) if e.is_not_found() => {
            println!(
                "{}",
                format!("Missing {}", config.definitions_path.display()).bright_red()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    if definitions.is_empty() {
        println!("{}", "No valid entries found in XML.".bright_red());
        return Ok(());
    }

    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        debug!("Received shutdown signal, stopping...");
        shutdown_ctrlc.trigger();
    })?;

    let mut monitor = Monitor::new(definitions, config, SystemProcessProvider);
    let mut dashboard = Dashboard::new(
        monitor.config().process_name.clone(),
        !args.no_clear,
        Arc::clone(&shutdown),
    );
    monitor.run(&shutdown, &mut dashboard);

    println!("\nExiting PHASMOWATCH. Goodbye.");
    Ok(())
}

/// Config file values with command line overrides applied.
fn build_config(args: &Args) -> MonitorConfig {
    let base = match &args.config {
        Some(path) => match MonitorConfig::load(path) {
            Ok(c) => {
                info!("Loaded config from {:?}", path);
                c
            }
            Err(e) => {
                warn!("Failed to load config: {}, using defaults", e);
                MonitorConfig::default()
            }
        },
        None => MonitorConfig::default(),
    };

    let mut builder = MonitorConfig::builder().base(base);
    if let Some(process) = &args.process {
        builder = builder.process_name(process.clone());
    }
    if let Some(interval) = args.interval {
        builder = builder.refresh_interval_secs(interval);
    }
    if let Some(pointers) = &args.pointers {
        builder = builder.definitions_path(pointers.clone());
    }
    builder.build()
}
