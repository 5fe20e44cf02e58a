//! Where icon definition documents come from.
//!
//! A source turns an icon-set version into the raw bytes of its definition
//! document. Numeric versions are rewritten to the upstream tag convention
//! before being substituted into the `{version}` placeholder of the location:
//!
//! - `4.7.0` → `v4.7.0`
//! - `master` → `master`

mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalSource;

use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder replaced by the source tag in a location template
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Default request timeout for HTTP sources
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Rewrite a version to the tag it is published under.
///
/// Purely numeric versions (digits and dots) gain a `v` prefix; anything
/// else is taken to be a tag or branch name already.
pub fn source_tag(version: &str) -> Cow<'_, str> {
    let numeric = !version.is_empty() && version.chars().all(|c| c.is_ascii_digit() || c == '.');
    if numeric {
        Cow::Owned(format!("v{version}"))
    } else {
        Cow::Borrowed(version)
    }
}

/// Substitute the source tag for `version` into a location template
pub fn resolve_location(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, &source_tag(version))
}

/// Encoding of a definition document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// JSON document
    Json,
    /// YAML document, as published upstream (`icons.yml`)
    #[default]
    Yaml,
}

impl SourceFormat {
    /// Guess the format from a location's extension, defaulting to YAML
    pub fn detect(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        if path.to_ascii_lowercase().ends_with(".json") {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

impl std::str::FromStr for SourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(Error::config(format!("unknown source format: {other}"))),
        }
    }
}

/// Fetches raw definition documents for an icon-set version.
///
/// Failures surface as [`Error::SourceUnavailable`]; sources never retry.
#[trait_variant::make(Send)]
pub trait CatalogSource {
    /// Encoding of the documents this source returns
    fn format(&self) -> SourceFormat;

    /// Location the given version resolves to
    fn location(&self, version: &str) -> String;

    /// Fetch the raw document for `version`
    fn fetch(&self, version: &str) -> impl Future<Output = Result<Bytes>>;
}

/// The source implementations, selected at construction time
#[derive(Debug, Clone)]
pub enum SourceType {
    /// Remote document over HTTP(S)
    Http(HttpSource),
    /// Document on the local filesystem
    Local(LocalSource),
}

impl SourceType {
    /// Pick a source for a location template.
    ///
    /// `http://` and `https://` locations are fetched remotely; anything else
    /// (optionally prefixed with `file://`) is read from disk. The format is
    /// detected from the extension unless given.
    pub fn from_location(
        template: &str,
        format: Option<SourceFormat>,
        timeout: Duration,
    ) -> Result<Self> {
        let format = format.unwrap_or_else(|| SourceFormat::detect(template));
        if template.starts_with("http://") || template.starts_with("https://") {
            Ok(Self::Http(HttpSource::new(template, format, timeout)?))
        } else {
            let path = template.strip_prefix("file://").unwrap_or(template);
            Ok(Self::Local(LocalSource::new(path, format)))
        }
    }
}

impl CatalogSource for SourceType {
    fn format(&self) -> SourceFormat {
        match self {
            SourceType::Http(s) => s.format(),
            SourceType::Local(s) => s.format(),
        }
    }

    fn location(&self, version: &str) -> String {
        match self {
            SourceType::Http(s) => s.location(version),
            SourceType::Local(s) => s.location(version),
        }
    }

    async fn fetch(&self, version: &str) -> Result<Bytes> {
        match self {
            SourceType::Http(s) => s.fetch(version).await,
            SourceType::Local(s) => s.fetch(version).await,
        }
    }
}

impl<T: CatalogSource + Sync> CatalogSource for std::sync::Arc<T> {
    fn format(&self) -> SourceFormat {
        self.as_ref().format()
    }

    fn location(&self, version: &str) -> String {
        self.as_ref().location(version)
    }

    fn fetch(&self, version: &str) -> impl Future<Output = Result<Bytes>> + Send {
        self.as_ref().fetch(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_versions_gain_tag_prefix() {
        assert_eq!(source_tag("4.7.0"), "v4.7.0");
        assert_eq!(source_tag("5"), "v5");
        assert_eq!(source_tag("master"), "master");
        assert_eq!(source_tag("v4.7.0"), "v4.7.0");
        assert_eq!(source_tag("4.7.0-beta"), "4.7.0-beta");
        assert_eq!(source_tag(""), "");
    }

    #[test]
    fn location_substitution() {
        assert_eq!(
            resolve_location(
                "https://raw.githubusercontent.com/FortAwesome/Font-Awesome/{version}/src/icons.yml",
                "4.7.0"
            ),
            "https://raw.githubusercontent.com/FortAwesome/Font-Awesome/v4.7.0/src/icons.yml"
        );
    }

    #[test]
    fn format_detection() {
        assert_eq!(SourceFormat::detect("https://x/icons.yml"), SourceFormat::Yaml);
        assert_eq!(SourceFormat::detect("/srv/icons.JSON"), SourceFormat::Json);
        assert_eq!(SourceFormat::detect("https://x/icons.json?raw=1"), SourceFormat::Json);
        assert_eq!("yml".parse::<SourceFormat>().unwrap(), SourceFormat::Yaml);
        assert!("toml".parse::<SourceFormat>().is_err());
    }

    #[test]
    fn source_selection() {
        let http = SourceType::from_location("https://x/{version}/icons.yml", None, DEFAULT_TIMEOUT)
            .unwrap();
        assert!(matches!(http, SourceType::Http(_)));
        assert_eq!(http.location("1.0"), "https://x/v1.0/icons.yml");

        let local =
            SourceType::from_location("file:///srv/{version}.json", None, DEFAULT_TIMEOUT).unwrap();
        assert!(matches!(local, SourceType::Local(_)));
        assert_eq!(local.format(), SourceFormat::Json);
        assert_eq!(local.location("master"), "/srv/master.json");
    }
}
