//! Dependency lists (`.tcz.dep`)

use crate::error::{TceError, TceResult};
use crate::repo::resource::PACKAGE_SUFFIX;
use crate::repo::{CacheStore, Entry, ResourceKind};
use std::io::{BufRead, BufReader, Read};

/// Dependencies of `name` in file order.
///
/// An extension without a `.tcz.dep` on the mirror has no dependencies.
pub fn dependencies(store: &CacheStore, name: &str) -> TceResult<Vec<String>> {
    let resource = ResourceKind::Dependencies.path_for(name);

    match store.fetch(&resource)? {
        Entry::KnownAbsent => Ok(Vec::new()),
        Entry::Present(file) => parse_dependencies(file, &resource),
    }
}

/// Parse a dependency list: one `<name>.tcz` per line, blank lines ignored.
///
/// Names are returned as written, so a `KERNEL` placeholder is still
/// present for the resolver to substitute.
pub fn parse_dependencies<R: Read>(reader: R, resource: &str) -> TceResult<Vec<String>> {
    let mut names = Vec::new();

    for line in BufReader::new(reader).lines() {
        let line = line.map_err(|e| TceError::io(format!("reading {}", resource), e))?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let name = line.strip_suffix(PACKAGE_SUFFIX).unwrap_or(line);
        names.push(name.to_string());
    }

    Ok(names)
}
