//! HTTP access to the extension mirror

use crate::error::{TceError, TceResult};
use std::io::Read;
use std::time::Duration;
use tracing::debug;
use ureq::http::{header::CONTENT_LENGTH, StatusCode};

/// Outcome of a GET against the mirror
pub enum Response {
    /// 2xx with a body to stream
    Found {
        body: Box<dyn Read>,
        length: Option<u64>,
    },
    /// 404, a definitive negative answer
    NotFound,
}

/// Minimal blocking GET interface used by the cache store
pub trait Transport {
    /// Fetch `url`. Statuses other than 2xx and 404 are errors.
    fn get(&self, url: &str) -> TceResult<Response>;
}

/// Location of one release/architecture on a mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    base_url: String,
    release: String,
    arch: String,
}

impl Mirror {
    pub fn new(
        base_url: impl Into<String>,
        release: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            release: release.into(),
            arch: arch.into(),
        }
    }

    /// Full URL of a resource: `<base>/<release>/<arch>/tcz/<resource>`
    pub fn url(&self, resource: &str) -> String {
        format!(
            "{}/{}/{}/tcz/{}",
            self.base_url.trim_end_matches('/'),
            self.release,
            self.arch,
            resource
        )
    }
}

/// `ureq` backed transport
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Create a transport. `None` means requests never time out.
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .user_agent(concat!("tce-fetch/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> TceResult<Response> {
        debug!("GET {}", url);
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| TceError::transport(url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Response::NotFound);
        }
        if !status.is_success() {
            return Err(TceError::HttpStatus {
                url: url.to_string(),
                status: status.to_string(),
            });
        }

        let length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        Ok(Response::Found {
            body: Box::new(response.into_body().into_reader()),
            length,
        })
    }
}
