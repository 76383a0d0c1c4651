//! Dependency resolution
//!
//! An extension is resolved once its payload is in the cache and matches
//! the published checksum (when there is one). Its dependencies are then
//! resolved depth-first in the order the `.tcz.dep` file lists them.
//!
//! # Per-extension states
//!
//! | State | Meaning |
//! |-------|---------|
//! | Unseen | Not yet looked at in this run |
//! | Fetching | Payload and checksum being fetched |
//! | Resolved | Verified and recorded in the context, never fetched again this run |
//! | Failed | Not found, checksum mismatch or transport error; aborts the request |

pub mod checksum;
pub mod deps;
pub mod resolver;

pub use checksum::ChecksumAlgorithm;
pub use deps::dependencies;
pub use resolver::{ResolutionContext, Resolver, Summary};
