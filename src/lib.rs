//! tce-fetch - Tiny Core extension downloader
//!
//! Resolves extensions and their dependency closure against a mirror and
//! keeps the result in a local directory that doubles as a persistent
//! cache, so the files can be installed later without network access.

pub mod cli;
pub mod config;
pub mod error;
pub mod repo;
pub mod resolve;
pub mod ui;

pub use error::{TceError, TceResult};
