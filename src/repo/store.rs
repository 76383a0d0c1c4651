//! Cache-backed fetcher
//!
//! Every resource is looked up in the cache directory first. Only a
//! missing file triggers a request, and the answer is always persisted:
//! the body for a 2xx, a zero-length marker for a 404.

use crate::error::{TceError, TceResult};
use crate::repo::events::{FetchEvent, FetchObserver};
use crate::repo::resource::ResourceKind;
use crate::repo::transport::{Mirror, Response, Transport};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of a fetch: a readable cache file or a confirmed absence
#[derive(Debug)]
pub enum Entry {
    /// Non-empty cache file, positioned at the start
    Present(File),
    /// The mirror does not publish this resource
    KnownAbsent,
}

impl Entry {
    /// The open file, if the resource exists
    pub fn into_file(self) -> Option<File> {
        match self {
            Self::Present(file) => Some(file),
            Self::KnownAbsent => None,
        }
    }
}

/// On-disk state of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CacheState {
    /// Never fetched
    Missing,
    /// Zero-length marker left by a 404
    KnownAbsent,
    /// Downloaded content
    Present { size: u64 },
}

/// A file found in the cache directory
#[derive(Debug, Clone, Serialize)]
pub struct CachedFile {
    pub file_name: String,
    pub package: String,
    pub kind: String,
    #[serde(flatten)]
    pub state: CacheState,
}

/// Cache directory plus the mirror it mirrors
pub struct CacheStore {
    base_dir: PathBuf,
    mirror: Mirror,
    transport: Box<dyn Transport>,
    observer: Box<dyn FetchObserver>,
}

impl CacheStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed
    pub fn open(
        base_dir: impl Into<PathBuf>,
        mirror: Mirror,
        transport: Box<dyn Transport>,
        observer: Box<dyn FetchObserver>,
    ) -> TceResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| {
            TceError::io(format!("creating cache directory {}", base_dir.display()), e)
        })?;

        Ok(Self {
            base_dir,
            mirror,
            transport,
            observer,
        })
    }

    /// Root of the cache
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Fetch a resource, consulting the cache before the mirror.
    ///
    /// After a successful return a cache file exists for `resource`.
    pub fn fetch(&self, resource: &str) -> TceResult<Entry> {
        self.observer.on_event(resource, FetchEvent::Checking);

        let result = self.lookup(resource).and_then(|cached| match cached {
            Some(entry) => {
                let event = match entry {
                    Entry::Present(_) => FetchEvent::Present,
                    Entry::KnownAbsent => FetchEvent::KnownAbsent,
                };
                self.observer.on_event(resource, event);
                Ok(entry)
            }
            None => {
                self.observer.on_event(resource, FetchEvent::Absent);
                self.download(resource)
            }
        });

        if result.is_err() {
            self.observer.on_event(resource, FetchEvent::Failed);
        }
        result
    }

    /// Inspect a cache entry without touching the network
    pub fn state(&self, resource: &str) -> TceResult<CacheState> {
        let path = self.base_dir.join(resource);
        match fs::metadata(&path) {
            Ok(meta) if meta.len() > 0 => Ok(CacheState::Present { size: meta.len() }),
            Ok(_) => Ok(CacheState::KnownAbsent),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(CacheState::Missing),
            Err(e) => Err(TceError::io(format!("checking {}", path.display()), e)),
        }
    }

    /// List recognised cache files, sorted by file name
    pub fn entries(&self) -> TceResult<Vec<CachedFile>> {
        let read_dir = fs::read_dir(&self.base_dir).map_err(|e| {
            TceError::io(format!("listing {}", self.base_dir.display()), e)
        })?;

        let mut files = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry
                .map_err(|e| TceError::io(format!("listing {}", self.base_dir.display()), e))?;
            let file_name = dir_entry.file_name().to_string_lossy().into_owned();

            let Some((package, kind)) = ResourceKind::classify(&file_name) else {
                continue;
            };

            files.push(CachedFile {
                package: package.to_string(),
                kind: kind.to_string(),
                state: self.state(&file_name)?,
                file_name,
            });
        }

        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }

    fn lookup(&self, resource: &str) -> TceResult<Option<Entry>> {
        let path = self.base_dir.join(resource);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Cache miss: {}", resource);
                return Ok(None);
            }
            Err(e) => return Err(TceError::io(format!("opening {}", path.display()), e)),
        };

        let size = file
            .metadata()
            .map_err(|e| TceError::io(format!("checking {}", path.display()), e))?
            .len();

        debug!("Cache hit: {} ({} bytes)", resource, size);
        if size > 0 {
            Ok(Some(Entry::Present(file)))
        } else {
            Ok(Some(Entry::KnownAbsent))
        }
    }

    fn download(&self, resource: &str) -> TceResult<Entry> {
        let path = self.base_dir.join(resource);
        let url = self.mirror.url(resource);

        self.observer.on_event(resource, FetchEvent::Downloading);

        match self.transport.get(&url)? {
            Response::NotFound => {
                File::create(&path)
                    .map_err(|e| TceError::io(format!("creating {}", path.display()), e))?;
                info!("{} is not on the mirror, recorded as absent", resource);
                self.observer.on_event(resource, FetchEvent::Ok);
                Ok(Entry::KnownAbsent)
            }
            Response::Found { body, length } => {
                let written = self.store_body(resource, &path, body, length)?;
                info!("Downloaded {} ({} bytes)", resource, written);

                // An empty body reads back as the absence marker next run
                if written == 0 {
                    self.observer.on_event(resource, FetchEvent::Ok);
                    return Ok(Entry::KnownAbsent);
                }

                let file = File::open(&path)
                    .map_err(|e| TceError::io(format!("opening {}", path.display()), e))?;
                self.observer.on_event(resource, FetchEvent::Ok);
                Ok(Entry::Present(file))
            }
        }
    }

    /// Stream `body` to a `.part` file and move it into place once complete
    fn store_body(
        &self,
        resource: &str,
        path: &Path,
        body: Box<dyn Read>,
        total: Option<u64>,
    ) -> TceResult<u64> {
        let part_path = part_path(path);

        let result = self
            .write_part(resource, &part_path, body, total)
            .and_then(|bytes| {
                fs::rename(&part_path, path).map_err(|e| {
                    TceError::io(format!("moving {} into place", path.display()), e)
                })?;
                Ok(bytes)
            });

        if result.is_err() {
            let _ = fs::remove_file(&part_path);
        }
        result
    }

    fn write_part(
        &self,
        resource: &str,
        part_path: &Path,
        mut body: Box<dyn Read>,
        total: Option<u64>,
    ) -> TceResult<u64> {
        let mut part = File::create(part_path)
            .map_err(|e| TceError::io(format!("creating {}", part_path.display()), e))?;

        let mut buffer = [0u8; 8192];
        let mut bytes = 0u64;
        loop {
            let n = body
                .read(&mut buffer)
                .map_err(|e| TceError::transport(self.mirror.url(resource), e))?;
            if n == 0 {
                break;
            }
            part.write_all(&buffer[..n])
                .map_err(|e| TceError::io(format!("writing {}", part_path.display()), e))?;
            bytes += n as u64;
            self.observer
                .on_event(resource, FetchEvent::Transferred { bytes, total });
        }

        part.sync_all()
            .map_err(|e| TceError::io(format!("writing {}", part_path.display()), e))?;
        Ok(bytes)
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
