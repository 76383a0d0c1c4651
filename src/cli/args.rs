//! CLI argument definitions using clap derive

use crate::config::Overrides;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// tce-fetch - Tiny Core extension downloader
///
/// Downloads extensions and everything they depend on into a local
/// directory, ready to be copied to a machine without network access.
#[derive(Parser, Debug)]
#[command(name = "tce-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TCE_FETCH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download extensions and their dependencies
    Get(GetArgs),

    /// Inspect the local extension cache
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Mirror and output selection shared by commands that touch the cache
#[derive(Args, Debug, Clone, Default)]
pub struct RepoArgs {
    /// Architecture to fetch extensions for
    #[arg(short, long, env = "TCE_ARCH")]
    pub arch: Option<String>,

    /// Tiny Core release to fetch extensions for (e.g. 8.x)
    #[arg(short, long, env = "TCE_VERSION")]
    pub release: Option<String>,

    /// Kernel name used for kernel-specific extensions
    #[arg(short, long, env = "TCE_KERNEL")]
    pub kernel: Option<String>,

    /// Output directory; %v is replaced by the release, %a by the architecture
    #[arg(short, long, env = "TCE_OUT")]
    pub out: Option<String>,

    /// Mirror base URL
    #[arg(long, env = "TCE_MIRROR")]
    pub mirror: Option<String>,
}

impl RepoArgs {
    /// Values to layer over the configuration file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            mirror: self.mirror.clone(),
            version: self.release.clone(),
            arch: self.arch.clone(),
            kernel: self.kernel.clone(),
            out: self.out.clone(),
        }
    }
}

/// Arguments for the get command
#[derive(Parser, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Extensions to download (with or without the .tcz suffix)
    #[arg(required = true, value_name = "EXTENSION")]
    pub extensions: Vec<String>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached files and their state
    List {
        #[command(flatten)]
        repo: RepoArgs,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the cache state of extensions without fetching anything
    Status {
        #[command(flatten)]
        repo: RepoArgs,

        /// Extensions to inspect
        #[arg(required = true, value_name = "EXTENSION")]
        extensions: Vec<String>,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
