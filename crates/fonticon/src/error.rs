//! Error types for catalog building, class templating and configuration.

use http::StatusCode;
use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while building catalogs, resolving class names or loading configuration.
///
/// An unknown class identifier is deliberately absent: lookups for it answer `Ok(None)`.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// The icon definition document could not be retrieved
    #[error("icon source unavailable: {location}")]
    #[diagnostic(
        code(fonticon::source_unavailable),
        help("check network connectivity and the configured source location")
    )]
    SourceUnavailable {
        /// URL or path that was requested
        location: String,
        /// Transport or I/O failure behind it
        #[source]
        #[diagnostic_source]
        source: SourceError,
    },

    /// The icon definition document is structurally malformed
    #[error("invalid catalog data: {message}")]
    #[diagnostic(
        code(fonticon::invalid_catalog_data),
        help("expected a top-level `icons` list whose entries carry id, name, unicode and categories")
    )]
    InvalidCatalogData {
        /// What was wrong with the document
        message: String,
        /// Decoder error, when one was reported
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A class template was rendered with fewer arguments than it references
    #[error("class template `{key}` expects {expected} argument(s), got {given}")]
    #[diagnostic(
        code(fonticon::template_arity),
        help("pass one argument per placeholder, e.g. the icon id for `icon`")
    )]
    TemplateArity {
        /// Semantic key of the template
        key: String,
        /// Highest argument index referenced by the template
        expected: usize,
        /// Number of arguments supplied
        given: usize,
    },

    /// A class template uses placeholder syntax we do not understand
    #[error("malformed class template `{key}`: {message}")]
    #[diagnostic(
        code(fonticon::invalid_template),
        help("supported placeholders are `%s`, `%1$s` and `%%`")
    )]
    InvalidTemplate {
        /// Semantic key of the template
        key: String,
        /// What was wrong with it
        message: String,
    },

    /// A stored icon value does not fit the persisted column
    #[error("invalid icon value `{value}`: {message}")]
    #[diagnostic(code(fonticon::invalid_icon_value))]
    InvalidIconValue {
        /// Offending value
        value: String,
        /// What was wrong with it
        message: String,
    },

    /// Catalog store failure
    #[error("catalog store error: {0}")]
    #[diagnostic(code(fonticon::store))]
    Store(
        #[from]
        #[diagnostic_source]
        StoreError,
    ),

    /// Configuration could not be loaded
    #[error("configuration error: {message}")]
    #[diagnostic(code(fonticon::config))]
    Config {
        /// What was wrong with the configuration
        message: String,
    },
}

impl Error {
    /// Create a source-unavailable error for the given location
    pub fn source_unavailable(location: impl Into<String>, source: impl Into<SourceError>) -> Self {
        Self::SourceUnavailable {
            location: location.into(),
            source: source.into(),
        }
    }

    /// Create an invalid-catalog error without an underlying cause
    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        Self::InvalidCatalogData {
            message: message.into(),
            source: None,
        }
    }

    /// Create an invalid-catalog error wrapping a decoder error
    pub fn invalid_catalog_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidCatalogData {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-template error
    pub fn invalid_template(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Transport-level failures while retrieving a source document
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    /// Failed to establish connection to the server
    #[error("connection error: {0}")]
    Connect(String),

    /// Request timed out
    #[error("request timeout")]
    Timeout,

    /// Request construction failed (malformed URL, headers, etc.)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Server answered with a non-success status
    #[error("HTTP status {0}")]
    HttpStatus(StatusCode),

    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other transport error
    #[error("transport error: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_builder() || e.is_request() {
            Self::InvalidRequest(e.to_string())
        } else if let Some(status) = e.status() {
            Self::HttpStatus(status)
        } else {
            Self::Other(Box::new(e))
        }
    }
}

impl From<url::ParseError> for SourceError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}

/// Errors emitted by catalog stores.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    /// Filesystem or I/O error
    #[error("I/O error: {0}")]
    #[diagnostic(code(fonticon::store::io))]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("serialization error: {0}")]
    #[diagnostic(code(fonticon::store::serde))]
    Serde(#[from] serde_json::Error),
    /// Any other error from a store implementation
    #[error(transparent)]
    #[diagnostic(code(fonticon::store::other))]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;
