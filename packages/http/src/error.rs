/// Message carried by every unsupported-method failure.
pub const SUPPORTED_METHODS_MESSAGE: &str = "We only support GET, PUT, PATCH, POST and DELETE.";

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("URI syntax error: {0}")]
    UriSyntax(#[from] url::ParseError),

    #[error("Invalid URI: {message}")]
    InvalidUri { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Unsupported HTTP method {method}. We only support GET, PUT, PATCH, POST and DELETE.")]
    UnsupportedMethod { method: String },
}

impl Error {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_uri(message: impl Into<String>) -> Self {
        Error::InvalidUri {
            message: message.into(),
        }
    }

    /// True for both URI failure kinds, which are raised before any I/O.
    pub fn is_uri_syntax(&self) -> bool {
        matches!(self, Error::UriSyntax(_) | Error::InvalidUri { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    pub fn is_unsupported_method(&self) -> bool {
        matches!(self, Error::UnsupportedMethod { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::transport(error.to_string())
    }
}
