//! Progress events emitted by the cache store
//!
//! The store reports every resource access as an ordered sequence of
//! events. How they are displayed is up to the observer.

use tracing::debug;

/// State transition of a single resource access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchEvent {
    /// Looking for the resource in the cache directory
    Checking,
    /// Served from a non-empty cache file
    Present,
    /// Cache holds a zero-length marker
    KnownAbsent,
    /// Not cached yet, the mirror will be asked
    Absent,
    /// Request sent to the mirror
    Downloading,
    /// Bytes written so far, with the announced length if any
    Transferred { bytes: u64, total: Option<u64> },
    /// The mirror's answer is stored in the cache, either the body or
    /// a zero-length marker for a 404
    Ok,
    /// The access failed, an error is being returned
    Failed,
}

/// Receives fetch events from the cache store
pub trait FetchObserver {
    /// Called for each state transition of `resource`
    fn on_event(&self, resource: &str, event: FetchEvent);
}

/// Observer that forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn on_event(&self, resource: &str, event: FetchEvent) {
        match event {
            FetchEvent::Transferred { .. } => {}
            other => debug!("{}: {:?}", resource, other),
        }
    }
}
