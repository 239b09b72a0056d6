//! # restcall-http
//!
//! A thin HTTP call layer for REST-style APIs.
//!
//! Given a method, host, endpoint path, query parameters, headers and body,
//! the [`Client`] builds a URI, performs exactly one call through a
//! [`Transport`] and hands back a [`Response`] holding the status code, the
//! body text and the response headers. There is no retry, caching or
//! connection management at this layer; the transport handles all of that.
//!
//! ## URI building
//!
//! The scheme is fixed when the client is built (`https` unless
//! [`ClientConfig::plain_http`] is set). A query value containing `&` is sent
//! once per `&`-separated token under the same key:
//!
//! ```ignore
//! use restcall_http::{Client, QueryParams};
//!
//! let client = Client::new()?;
//! let mut params = QueryParams::new();
//! params.insert("test3".to_string(), "3&4&5".to_string());
//!
//! let uri = client.build_uri("api.test.com", "/endpoint", Some(&params))?;
//! assert_eq!(uri.as_str(), "https://api.test.com/endpoint?test3=3&test3=4&test3=5");
//! ```
//!
//! ## Calls
//!
//! ```ignore
//! use restcall_http::{Client, Request};
//!
//! let client = Client::new()?;
//! let request = Request::post("/v3/mail/send")
//!     .with_base_uri("api.example.com")
//!     .with_header("Authorization", "Bearer XXXX")
//!     .with_body(r#"{"subject":"hello"}"#);
//!
//! let response = client.api(&request)?;
//! assert!(response.is_success());
//! ```
//!
//! ## Transport ownership
//!
//! [`Client::new`] and [`Client::with_config`] create a [`ReqwestTransport`]
//! that the client owns and releases on [`Client::close`] (or drop).
//! [`Client::with_transport`] borrows a caller-owned transport and never
//! closes it.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;
pub mod uri;

pub use client::{get_response, Client, ClientConfig};
pub use error::{Error, Result};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportRequest};
pub use types::{Headers, Method, QueryParams, Request, Response};
pub use uri::{Scheme, UriBuilder};
