//! Local mirror of an extension repository
//!
//! Resources (`.tcz`, `.tcz.md5.txt`, `.tcz.dep`) are stored flat in one
//! directory per release and architecture. The directory doubles as a
//! persistent cache that remembers negative answers from the mirror.
//!
//! # Cache States
//!
//! | State | On disk | Description |
//! |-------|---------|-------------|
//! | Missing | no file | Never fetched, the next access asks the mirror |
//! | Known-absent | zero-length file | Mirror answered 404, never asked again |
//! | Present | non-empty file | Downloaded content |

pub mod events;
pub mod resource;
pub mod store;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;

pub use events::{FetchEvent, FetchObserver, TracingObserver};
pub use resource::{expand_placeholder, validate_name, ResourceKind, PLACEHOLDER};
pub use store::{CacheState, CacheStore, CachedFile, Entry};
pub use transport::{HttpTransport, Mirror, Response, Transport};
