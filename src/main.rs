//! tce-fetch - Tiny Core extension downloader
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tce_fetch::cli::{Cli, Commands};
use tce_fetch::config::ConfigManager;
use tce_fetch::error::TceResult;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> TceResult<()> {
    let cli = Cli::parse();

    // Completions don't need config or logging
    if let Commands::Completions(args) = cli.command {
        return tce_fetch::cli::commands::completions(args);
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;

    init_logging(cli.verbose, &config.general.log_format);

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Get(args) => tce_fetch::cli::commands::get(args, &config),
        Commands::Cache(args) => tce_fetch::cli::commands::cache(args, &config),
        Commands::Config(args) => tce_fetch::cli::commands::config(args, &config, &config_manager),
    }
}

/// 0 = warn, 1 = info, 2+ = debug; RUST_LOG wins when set
fn init_logging(verbose: u8, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("tce_fetch=warn"),
        1 => EnvFilter::new("tce_fetch=info"),
        _ => EnvFilter::new("tce_fetch=debug"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
