//! UI module for consistent CLI output
//!
//! Uses `cliclack` for step logging and `indicatif` for download progress,
//! with automatic fallback to plain output in CI/non-interactive
//! environments.

mod context;
mod output;
mod reporter;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_error, outro_success, step_error_detail, step_info, step_ok,
    step_ok_detail, step_warn_hint,
};
pub use reporter::ConsoleReporter;
