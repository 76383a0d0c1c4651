//! CLI command implementations

pub mod cache;
pub mod completions;
pub mod config;
pub mod get;

pub use cache::execute as cache;
pub use completions::execute as completions;
pub use config::execute as config;
pub use get::execute as get;
