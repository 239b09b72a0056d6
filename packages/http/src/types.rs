use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Query parameters.
///
/// Built URIs list keys in sorted order, not insertion order; the values
/// split out of one key keep their order. A value may carry several logical
/// values joined by `&`.
pub type QueryParams = BTreeMap<String, String>;

/// Header name to value. Names are kept exactly as given.
pub type Headers = HashMap<String, String>;

/// HTTP methods this client dispatches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            other => Err(Error::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PUT => http::Method::PUT,
            Method::PATCH => http::Method::PATCH,
            Method::DELETE => http::Method::DELETE,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// A request descriptor.
///
/// Built by the caller, then handed to [`Client::api`](crate::Client::api)
/// or one of the per-verb operations. It is only read during a call.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Request {
    /// Absent until set; `api` refuses a request without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,

    /// Host, optionally with a port (e.g. `api.example.com`, `localhost:8080`).
    #[serde(default)]
    pub base_uri: String,

    /// Path of the endpoint (e.g. `/v3/mail/send`).
    #[serde(default)]
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_params: QueryParams,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: Headers,

    /// JSON-formatted text; empty means no body.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::for_method(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::for_method(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::for_method(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::for_method(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::for_method(Method::DELETE, endpoint)
    }

    fn for_method(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a query parameter, replacing any earlier value for the same key.
    ///
    /// Join several values with `&` to send the key once per value.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_json_body(mut self, body: impl Serialize) -> Result<Self, serde_json::Error> {
        self.body = serde_json::to_string(&body)?;
        Ok(self)
    }
}

/// A response descriptor, produced once per call and never mutated by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,

    /// `None` when the transport returned no entity; distinct from an empty body.
    #[serde(default)]
    pub body: Option<String>,

    /// Header names exactly as the transport reported them.
    #[serde(default)]
    pub headers: Headers,
}

impl Response {
    pub fn new(status_code: u16, body: Option<String>, headers: Headers) -> Self {
        Self {
            status_code,
            body,
            headers,
        }
    }

    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Check if the response status indicates a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Check if the response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Deserialize the body; an absent body reads as JSON `null`.
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        match &self.body {
            Some(text) => serde_json::from_str(text),
            None => serde_json::from_value(serde_json::Value::Null),
        }
    }
}
