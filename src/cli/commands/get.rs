//! Get command - download extensions and their dependency closure

use crate::cli::args::GetArgs;
use crate::config::Config;
use crate::error::{TceError, TceResult};
use crate::repo::resource::PACKAGE_SUFFIX;
use crate::repo::{CacheStore, FetchObserver, HttpTransport, Mirror};
use crate::resolve::{ResolutionContext, Resolver};
use crate::ui::{self, ConsoleReporter, UiContext};
use std::time::Duration;
use tracing::info;

/// Execute the get command
pub fn execute(args: GetArgs, config: &Config) -> TceResult<()> {
    let mut config = config.clone();
    config.apply(args.repo.overrides());

    let ctx = UiContext::detect();
    let store = open_store(&config, Box::new(ConsoleReporter::new(&ctx)))?;

    ui::intro(&ctx, "tce-fetch");
    ui::key_value(&ctx, "Base directory", &store.base_dir().display().to_string());
    ui::key_value(&ctx, "Mirror", &mirror(&config).url(""));

    let names: Vec<&str> = args
        .extensions
        .iter()
        .map(|name| name.strip_suffix(PACKAGE_SUFFIX).unwrap_or(name))
        .collect();

    let resolver = Resolver::new(&store, config.repository.kernel.as_str())
        .with_checksum(config.repository.checksum);
    let mut resolution = ResolutionContext::new();

    let summary = resolver.resolve_all(&mut resolution, names.as_slice(), |name, result| {
        match result {
            Ok(()) => ui::step_ok(&ctx, &format!("Retrieved {} successfully", name)),
            Err(e) => {
                ui::step_error_detail(&ctx, &format!("Failed to get {}", name), &e.to_string())
            }
        }
    });

    info!(
        "Resolved {} extension(s) for {} request(s)",
        resolution.len(),
        summary.requested()
    );

    if summary.is_success() {
        ui::outro_success(
            &ctx,
            &format!(
                "{} extension(s) ready in {}",
                resolution.len(),
                store.base_dir().display()
            ),
        );
        return Ok(());
    }

    let failed: Vec<&str> = summary.failed.iter().map(|(name, _)| name.as_str()).collect();
    ui::outro_error(&ctx, &format!("Failed: {}", failed.join(", ")));

    Err(TceError::User(format!(
        "{} of {} requested extension(s) failed",
        summary.failed.len(),
        summary.requested()
    )))
}

/// Mirror location for the configured release and architecture
pub fn mirror(config: &Config) -> Mirror {
    Mirror::new(
        config.repository.mirror.as_str(),
        config.repository.version.as_str(),
        config.repository.arch.as_str(),
    )
}

/// Open the cache store for the configured output directory
pub fn open_store(config: &Config, observer: Box<dyn FetchObserver>) -> TceResult<CacheStore> {
    let timeout = match config.repository.timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    CacheStore::open(
        config.base_dir(),
        mirror(config),
        Box::new(HttpTransport::new(timeout)),
        observer,
    )
}
