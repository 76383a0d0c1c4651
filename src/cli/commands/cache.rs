//! Cache command - inspect the local extension cache

use super::get::open_store;
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat, RepoArgs};
use crate::config::Config;
use crate::error::TceResult;
use crate::repo::{
    expand_placeholder, CacheState, CacheStore, CachedFile, ResourceKind, TracingObserver,
};
use crate::ui::{self, UiContext};
use console::style;
use indicatif::HumanBytes;

/// Execute the cache command
pub fn execute(args: CacheArgs, config: &Config) -> TceResult<()> {
    match args.action {
        CacheAction::List { repo, format } => {
            let Some((_, store)) = existing_store(&repo, config)? else {
                return Ok(());
            };
            list_entries(&store, format)
        }
        CacheAction::Status { repo, extensions } => {
            let Some((config, store)) = existing_store(&repo, config)? else {
                return Ok(());
            };
            show_status(&store, &config, &extensions)
        }
    }
}

/// Open the store only if the cache directory already exists
fn existing_store(repo: &RepoArgs, config: &Config) -> TceResult<Option<(Config, CacheStore)>> {
    let mut config = config.clone();
    config.apply(repo.overrides());

    let base_dir = config.base_dir();
    if !base_dir.is_dir() {
        let ctx = UiContext::detect();
        ui::step_info(&ctx, &format!("No cache at {}", base_dir.display()));
        return Ok(None);
    }

    let store = open_store(&config, Box::new(TracingObserver))?;
    Ok(Some((config, store)))
}

fn list_entries(store: &CacheStore, format: OutputFormat) -> TceResult<()> {
    let entries = store.entries()?;

    match format {
        OutputFormat::Table => print_table(store, &entries),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.file_name);
            }
        }
    }

    Ok(())
}

fn print_table(store: &CacheStore, entries: &[CachedFile]) {
    let ctx = UiContext::detect();
    if entries.is_empty() {
        ui::step_info(&ctx, &format!("{} is empty", store.base_dir().display()));
        return;
    }

    println!(
        "{:<40} {:<8} {:<14} {:>10}",
        style("FILE").bold(),
        style("KIND").bold(),
        style("STATE").bold(),
        style("SIZE").bold()
    );
    println!("{}", "-".repeat(75));

    let mut total = 0u64;
    let mut absent = 0usize;
    for entry in entries {
        let (state, size) = match entry.state {
            CacheState::Present { size } => {
                total += size;
                (style("present").green(), HumanBytes(size).to_string())
            }
            CacheState::KnownAbsent => {
                absent += 1;
                (style("absent").dim(), "-".to_string())
            }
            CacheState::Missing => (style("missing").yellow(), "-".to_string()),
        };

        println!(
            "{:<40} {:<8} {:<14} {:>10}",
            entry.file_name, entry.kind, state, size
        );
    }

    println!();
    println!(
        "{} file(s), {} known absent, {} total",
        entries.len(),
        absent,
        HumanBytes(total)
    );
}

fn show_status(store: &CacheStore, config: &Config, extensions: &[String]) -> TceResult<()> {
    let kinds = [
        ResourceKind::Payload,
        ResourceKind::Checksum(config.repository.checksum),
        ResourceKind::Dependencies,
    ];

    for extension in extensions {
        let name = expand_placeholder(extension, &config.repository.kernel);
        println!("{}", style(&name).bold());

        for kind in kinds {
            let resource = kind.path_for(&name);
            let state = match store.state(&resource)? {
                CacheState::Present { size } => {
                    style(format!("present ({})", HumanBytes(size))).green()
                }
                CacheState::KnownAbsent => style("known absent".to_string()).dim(),
                CacheState::Missing => style("not fetched".to_string()).yellow(),
            };
            println!("  {:<8} {}", kind.to_string(), state);
        }
    }

    Ok(())
}
