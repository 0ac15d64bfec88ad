use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use spdlog::{error, info, warn};

use markout::config::{open_config, Overrides, Settings, Verbosity};
use markout::logger::configure_logger;
use markout::post_processor::{process_posts, RunSummary};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Set output verbosity of messages
    #[arg(long, value_enum)]
    verbosity: Option<Verbosity>,

    /// Parse and index everything without touching the filesystem
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Input directory
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory. Posts are rewritten in place when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config path. Defaults to the first markout.toml found
    #[arg(short, long)]
    config_path: Option<PathBuf>,
}

fn run(args: Args) -> Result<RunSummary> {
    let config = open_config(args.config_path).context("Could not load configuration")?;

    if let Err(err) = configure_logger(&config, args.verbosity) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let overrides = Overrides {
        input_dir: args.input,
        output_dir: args.output,
        dry_run: args.dry_run,
    };
    let settings = Settings::resolve(&config, overrides, Local::now().fixed_offset())?;

    info!("Reading posts from '{}'", settings.input_dir.display());
    if settings.dry_run {
        info!("Dry run: no file will be written");
    }

    let summary = process_posts(&settings)?;
    Ok(summary)
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(summary) => {
            info!("Done. {}", summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            spdlog::default_logger().flush();
            ExitCode::FAILURE
        }
    }
}
