//! Recursive resolution of an extension and its dependency closure

use crate::error::{TceError, TceResult};
use crate::repo::{expand_placeholder, validate_name, CacheStore, Entry, ResourceKind};
use crate::resolve::checksum::{read_expected, verify, ChecksumAlgorithm};
use crate::resolve::deps::dependencies;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Extensions fully resolved during one run
#[derive(Debug, Default)]
pub struct ResolutionContext {
    visited: HashSet<String>,
    order: Vec<String>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` (already substituted) has been resolved
    pub fn contains(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    /// Resolved names in the order they were verified
    pub fn resolved(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn mark_resolved(&mut self, name: String) {
        if self.visited.insert(name.clone()) {
            self.order.push(name);
        }
    }
}

/// Outcome of resolving a list of requested extensions
#[derive(Debug, Default)]
pub struct Summary {
    /// Requested names that resolved
    pub succeeded: Vec<String>,
    /// Requested names that failed, with the error that stopped them
    pub failed: Vec<(String, TceError)>,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn requested(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Drives fetching and verification over a cache store
pub struct Resolver<'a> {
    store: &'a CacheStore,
    kernel: String,
    checksum: ChecksumAlgorithm,
}

impl<'a> Resolver<'a> {
    /// `kernel` replaces the `KERNEL` placeholder in extension names
    pub fn new(store: &'a CacheStore, kernel: impl Into<String>) -> Self {
        Self {
            store,
            kernel: kernel.into(),
            checksum: ChecksumAlgorithm::default(),
        }
    }

    /// Use a different published digest
    pub fn with_checksum(mut self, checksum: ChecksumAlgorithm) -> Self {
        self.checksum = checksum;
        self
    }

    /// Resolve every requested name in order.
    ///
    /// A failure is reported through `on_result` and recorded, then the
    /// next name is tried. Names share `ctx`, so an extension pulled in by
    /// an earlier request is not fetched again.
    pub fn resolve_all<S, F>(
        &self,
        ctx: &mut ResolutionContext,
        names: &[S],
        mut on_result: F,
    ) -> Summary
    where
        S: AsRef<str>,
        F: FnMut(&str, &TceResult<()>),
    {
        let mut summary = Summary::default();

        for name in names {
            let name = name.as_ref();
            let result = self.resolve(ctx, name);
            on_result(name, &result);

            match result {
                Ok(()) => summary.succeeded.push(name.to_string()),
                Err(e) => summary.failed.push((name.to_string(), e)),
            }
        }

        summary
    }

    /// Fetch and verify `name`, then its dependencies depth-first.
    ///
    /// The first failure anywhere in the closure aborts the whole call.
    pub fn resolve(&self, ctx: &mut ResolutionContext, name: &str) -> TceResult<()> {
        let name = expand_placeholder(name, &self.kernel);
        validate_name(&name)?;

        if ctx.contains(&name) {
            debug!("{} already resolved", name);
            return Ok(());
        }

        let payload = match self.store.fetch(&ResourceKind::Payload.path_for(&name))? {
            Entry::Present(file) => file,
            Entry::KnownAbsent => return Err(TceError::PackageNotFound(name)),
        };

        let checksum_resource = ResourceKind::Checksum(self.checksum).path_for(&name);
        let expected = match self.store.fetch(&checksum_resource)? {
            Entry::Present(file) => read_expected(file, &checksum_resource)?,
            Entry::KnownAbsent => None,
        };

        match expected {
            Some(expected) => verify(self.checksum, payload, &name, &expected)?,
            None => {
                drop(payload);
                warn!("No {} checksum published for {}, not verified", self.checksum, name);
            }
        }

        ctx.mark_resolved(name.clone());
        info!("Resolved {}", name);

        for dependency in dependencies(self.store, &name)? {
            self.resolve(ctx, &dependency)?;
        }

        Ok(())
    }
}
