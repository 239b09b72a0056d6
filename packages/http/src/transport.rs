//! HTTP transport abstraction.
//!
//! A [`Transport`] performs exactly one network round-trip per call. The
//! [`Client`](crate::Client) builds a [`TransportRequest`], hands it over and
//! normalizes the [`RawResponse`] it gets back. Tests swap in a mock so no
//! network is needed.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use url::Url;

use crate::error::{Error, Result};
use crate::types::Method;

/// Default timeout for the reqwest transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One outgoing request, already resolved to a URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    pub uri: Url,
    /// Sent in order, names untouched.
    pub headers: Vec<(String, String)>,
    /// UTF-8 text entity, if any.
    pub body: Option<String>,
}

impl TransportRequest {
    /// First header whose name matches ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as the transport saw it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// `None` when the response carried no entity at all.
    pub entity: Option<Vec<u8>>,
}

impl RawResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_entity(mut self, entity: impl Into<Vec<u8>>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

/// Trait for executing HTTP requests.
///
/// Implementations must be safe to call from several threads at once.
pub trait Transport: Send + Sync {
    /// Execute one request and return the raw response.
    ///
    /// Network and protocol failures come back as [`Error::Transport`].
    fn execute(&self, request: &TransportRequest) -> Result<RawResponse>;

    /// Release the resources held by this transport.
    ///
    /// Only called by a client that owns the transport.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Production transport using reqwest's blocking client.
pub struct ReqwestTransport {
    client: RwLock<Option<Client>>,
}

impl ReqwestTransport {
    /// Create a new transport with the given timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self> {
        Self::new(DEFAULT_TIMEOUT)
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client.read().map(|c| c.is_none()).unwrap_or(true)
    }
}

/// Statuses that never carry an entity.
fn has_entity(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

/// Decode a header value as ISO-8859-1, one char per byte, so no byte is lost.
fn decode_header_value(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &TransportRequest) -> Result<RawResponse> {
        let guard = self
            .client
            .read()
            .map_err(|_| Error::transport("transport lock poisoned"))?;
        let client = guard
            .as_ref()
            .ok_or_else(|| Error::transport("transport closed"))?;

        let method: http::Method = request.method.into();
        let mut req_builder = client.request(method, request.uri.clone());

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        let response = req_builder.send()?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.to_string(), decode_header_value(value.as_bytes())))
            .collect();

        let entity = if has_entity(status) {
            Some(response.bytes()?.to_vec())
        } else {
            None
        };

        Ok(RawResponse {
            status: status.as_u16(),
            headers,
            entity,
        })
    }

    fn close(&self) -> Result<()> {
        let mut guard = self
            .client
            .write()
            .map_err(|_| Error::transport("transport lock poisoned"))?;
        guard.take();
        Ok(())
    }
}
