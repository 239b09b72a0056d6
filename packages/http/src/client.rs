use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::transport::{
    RawResponse, ReqwestTransport, Transport, TransportRequest, DEFAULT_TIMEOUT,
};
use crate::types::{Headers, Method, QueryParams, Request, Response};
use crate::uri::{Scheme, UriBuilder};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Construction-time settings for a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Build `http` URIs instead of `https` ones.
    pub plain_http: bool,
    /// Request timeout of the transport the client creates for itself.
    /// Borrowed transports keep their own configuration.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            plain_http: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn plain_http(mut self, plain_http: bool) -> Self {
        self.plain_http = plain_http;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Who is responsible for releasing the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ownership {
    Owned,
    Borrowed,
}

/// Builds URIs and performs one HTTP call per operation.
///
/// Every operation makes exactly one attempt through the transport and
/// returns either a normalized [`Response`] or an [`Error`]; nothing is
/// retried.
///
/// # Example
///
/// ```ignore
/// use restcall_http::{Client, Request};
///
/// let client = Client::new()?;
/// let request = Request::get("/v3/templates")
///     .with_base_uri("api.example.com")
///     .with_header("Authorization", "Bearer XXXX")
///     .with_query("generations", "legacy&dynamic");
///
/// let response = client.api(&request)?;
/// println!("{} {:?}", response.status_code, response.body);
/// client.close()?;
/// ```
pub struct Client {
    transport: Arc<dyn Transport>,
    ownership: Ownership,
    uri_builder: UriBuilder,
    released: bool,
}

impl Client {
    /// Create a client over its own reqwest transport, using `https`.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client over its own reqwest transport.
    ///
    /// The client releases that transport on [`close`](Self::close) or drop.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::build(Arc::new(transport), Ownership::Owned, &config))
    }

    /// Create a client over a caller-owned transport, using `https`.
    ///
    /// The transport is never closed by this client.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::with_transport_and_config(transport, ClientConfig::default())
    }

    /// Create a client over a caller-owned transport.
    ///
    /// Only `plain_http` is taken from `config`.
    pub fn with_transport_and_config(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
    ) -> Self {
        Self::build(transport, Ownership::Borrowed, &config)
    }

    fn build(
        transport: Arc<dyn Transport>,
        ownership: Ownership,
        config: &ClientConfig,
    ) -> Self {
        Self {
            transport,
            ownership,
            uri_builder: UriBuilder::new(Scheme::from_plain_http(config.plain_http)),
            released: false,
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.uri_builder.scheme()
    }

    /// True when this client created its transport and must release it.
    pub fn owns_transport(&self) -> bool {
        self.ownership == Ownership::Owned
    }

    /// Compose `host`, `path` and `query_params` into a URI.
    ///
    /// See [`UriBuilder::build_uri`].
    pub fn build_uri(
        &self,
        host: &str,
        path: &str,
        query_params: Option<&QueryParams>,
    ) -> Result<Url> {
        self.uri_builder.build_uri(host, path, query_params)
    }

    /// Perform one call and normalize its response.
    ///
    /// Headers are sent verbatim. A non-empty `body` is attached as UTF-8
    /// text together with `Content-Type: application/json`, replacing any
    /// content type the caller set; an empty body attaches neither.
    pub fn execute(
        &self,
        method: Method,
        uri: Url,
        headers: &Headers,
        body: &str,
    ) -> Result<Response> {
        let mut request_headers: Vec<(String, String)> = headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let body = if body.is_empty() {
            None
        } else {
            request_headers.retain(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE));
            request_headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
            Some(body.to_string())
        };

        let request = TransportRequest {
            method,
            uri,
            headers: request_headers,
            body,
        };

        tracing::debug!(method = %request.method, uri = %request.uri, "dispatching request");

        let raw = self.transport.execute(&request)?;
        get_response(raw)
    }

    /// Make a GET request, whatever method `request` names.
    pub fn get(&self, request: &Request) -> Result<Response> {
        self.send(Method::GET, request)
    }

    /// Make a POST request, whatever method `request` names.
    pub fn post(&self, request: &Request) -> Result<Response> {
        self.send(Method::POST, request)
    }

    /// Make a PUT request, whatever method `request` names.
    pub fn put(&self, request: &Request) -> Result<Response> {
        self.send(Method::PUT, request)
    }

    /// Make a PATCH request, whatever method `request` names.
    pub fn patch(&self, request: &Request) -> Result<Response> {
        self.send(Method::PATCH, request)
    }

    /// Make a DELETE request, whatever method `request` names.
    pub fn delete(&self, request: &Request) -> Result<Response> {
        self.send(Method::DELETE, request)
    }

    /// Dispatch on `request.method`.
    ///
    /// Fails with [`Error::UnsupportedMethod`] before any I/O when the method
    /// is absent.
    pub fn api(&self, request: &Request) -> Result<Response> {
        match request.method {
            Some(Method::GET) => self.get(request),
            Some(Method::POST) => self.post(request),
            Some(Method::PUT) => self.put(request),
            Some(Method::PATCH) => self.patch(request),
            Some(Method::DELETE) => self.delete(request),
            None => Err(Error::UnsupportedMethod {
                method: "<none>".to_string(),
            }),
        }
    }

    /// Like [`api`](Self::api), with the method given by name.
    pub fn api_with_method(&self, method: &str, request: &Request) -> Result<Response> {
        let method: Method = method.parse()?;
        self.send(method, request)
    }

    fn send(&self, method: Method, request: &Request) -> Result<Response> {
        let uri = self.build_uri(
            &request.base_uri,
            &request.endpoint,
            Some(&request.query_params),
        )?;
        self.execute(method, uri, &request.headers, &request.body)
    }

    /// Release the transport if this client owns it.
    ///
    /// A borrowed transport is left untouched.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        match self.ownership {
            Ownership::Owned => self.transport.close(),
            Ownership::Borrowed => Ok(()),
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(error = %e, "failed to release HTTP transport");
        }
    }
}

/// Normalize a raw transport response.
///
/// An absent entity gives `body: None`; a present one must be valid UTF-8.
/// Headers are copied name-for-name.
pub fn get_response(raw: RawResponse) -> Result<Response> {
    let body = match raw.entity {
        Some(bytes) => Some(String::from_utf8(bytes).map_err(|e| {
            Error::transport(format!("response entity is not valid UTF-8: {}", e))
        })?),
        None => None,
    };

    let headers: Headers = raw.headers.into_iter().collect();

    tracing::debug!(status = raw.status, has_body = body.is_some(), "normalized response");

    Ok(Response::new(raw.status, body, headers))
}
