//! URI assembly from a host, an endpoint path and query parameters.
//!
//! A query value holding [`MULTI_VALUE_DELIMITER`] stands for several values
//! and is expanded into one `key=value` pair per value, in order.

use std::fmt;

use url::Url;

use crate::error::{Error, Result};
use crate::types::QueryParams;

/// Joins several logical values inside one query parameter value.
pub const MULTI_VALUE_DELIMITER: char = '&';

/// URI scheme, fixed per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    /// `Http` when plain HTTP was requested, `Https` otherwise.
    pub fn from_plain_http(plain_http: bool) -> Self {
        if plain_http {
            Scheme::Http
        } else {
            Scheme::Https
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UriBuilder {
    scheme: Scheme,
}

impl UriBuilder {
    pub fn new(scheme: Scheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Build `scheme://host/path?query`.
    ///
    /// `host` may include a port. `None` and empty `query_params` both give a
    /// URI without a query string.
    pub fn build_uri(
        &self,
        host: &str,
        path: &str,
        query_params: Option<&QueryParams>,
    ) -> Result<Url> {
        let mut url = Url::parse(&format!("{}://{}", self.scheme, host))?;

        if url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
            || !url.username().is_empty()
            || url.password().is_some()
        {
            return Err(Error::invalid_uri(format!(
                "host '{}' must not carry userinfo, path, query or fragment",
                host
            )));
        }

        url.set_path(path);

        let pairs: Vec<(&str, &str)> = query_params
            .into_iter()
            .flatten()
            .flat_map(|(key, value)| {
                let tokens = if value.contains(MULTI_VALUE_DELIMITER) {
                    split_multi_value(value)
                } else {
                    vec![value.as_str()]
                };
                tokens.into_iter().map(move |token| (key.as_str(), token))
            })
            .collect();

        // A value made only of delimiters yields no pair; leave the query unset.
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }
}

/// Split on the delimiter, dropping trailing empty tokens.
fn split_multi_value(value: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = value.split(MULTI_VALUE_DELIMITER).collect();
    while tokens.last().is_some_and(|token| token.is_empty()) {
        tokens.pop();
    }
    tokens
}
