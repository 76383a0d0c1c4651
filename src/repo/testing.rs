//! In-memory mirror and event recorder for unit tests

use crate::error::{TceError, TceResult};
use crate::repo::events::{FetchEvent, FetchObserver, TracingObserver};
use crate::repo::store::CacheStore;
use crate::repo::transport::{Mirror, Response, Transport};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Read};
use std::rc::Rc;
use tempfile::TempDir;

#[derive(Clone)]
enum Served {
    Body(Vec<u8>),
    Status(u16),
    Truncated(Vec<u8>),
}

#[derive(Default)]
struct RepoState {
    files: HashMap<String, Served>,
    requests: Vec<String>,
}

/// Mirror double keyed by resource path. Clones share state, so a test
/// can keep one handle while the store owns another.
#[derive(Clone, Default)]
pub struct MemoryRepo {
    state: Rc<RefCell<RepoState>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(self, resource: &str, body: &[u8]) -> Self {
        self.serve(resource, Served::Body(body.to_vec()))
    }

    pub fn text(self, resource: &str, body: &str) -> Self {
        self.file(resource, body.as_bytes())
    }

    pub fn failing(self, resource: &str, status: u16) -> Self {
        self.serve(resource, Served::Status(status))
    }

    /// Body that breaks off with an IO error after `body`
    pub fn truncated(self, resource: &str, body: &[u8]) -> Self {
        self.serve(resource, Served::Truncated(body.to_vec()))
    }

    /// Extension with payload, md5 checksum and dependency list
    pub fn package(self, name: &str, payload: &[u8], deps: &[&str]) -> Self {
        let digest = hex::encode(md5::compute(payload).0);
        let repo = self
            .file(&format!("{}.tcz", name), payload)
            .text(&format!("{}.tcz.md5.txt", name), &format!("{}  {}.tcz\n", digest, name));
        if deps.is_empty() {
            return repo;
        }
        let dep_file: String = deps.iter().map(|d| format!("{}.tcz\n", d)).collect();
        repo.text(&format!("{}.tcz.dep", name), &dep_file)
    }

    pub fn request_count(&self, resource: &str) -> usize {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|r| r.as_str() == resource)
            .count()
    }

    pub fn total_requests(&self) -> usize {
        self.state.borrow().requests.len()
    }

    fn serve(self, resource: &str, served: Served) -> Self {
        self.state
            .borrow_mut()
            .files
            .insert(resource.to_string(), served);
        self
    }
}

impl Transport for MemoryRepo {
    fn get(&self, url: &str) -> TceResult<Response> {
        let resource = url.rsplit('/').next().unwrap_or(url).to_string();
        let served = {
            let mut state = self.state.borrow_mut();
            state.requests.push(resource.clone());
            state.files.get(&resource).cloned()
        };

        match served {
            None => Ok(Response::NotFound),
            Some(Served::Body(body)) => Ok(Response::Found {
                length: Some(body.len() as u64),
                body: Box::new(io::Cursor::new(body)),
            }),
            Some(Served::Status(status)) => Err(TceError::HttpStatus {
                url: url.to_string(),
                status: status.to_string(),
            }),
            Some(Served::Truncated(body)) => Ok(Response::Found {
                length: None,
                body: Box::new(io::Cursor::new(body).chain(BrokenReader)),
            }),
        }
    }
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
    }
}

/// Observer that keeps every event for later assertions
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<(String, FetchEvent)>>>,
}

impl RecordingObserver {
    pub fn events_for(&self, resource: &str) -> Vec<FetchEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|(r, _)| r == resource)
            .map(|(_, e)| *e)
            .collect()
    }
}

impl FetchObserver for RecordingObserver {
    fn on_event(&self, resource: &str, event: FetchEvent) {
        self.events.borrow_mut().push((resource.to_string(), event));
    }
}

/// Store over `dir` backed by `repo`
pub fn store_with(dir: &TempDir, repo: &MemoryRepo) -> CacheStore {
    CacheStore::open(
        dir.path(),
        Mirror::new("http://mirror.test", "8.x", "x86"),
        Box::new(repo.clone()),
        Box::new(TracingObserver),
    )
    .unwrap()
}
