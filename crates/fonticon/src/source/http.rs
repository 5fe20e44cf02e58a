use std::time::Duration;

use bytes::Bytes;
use url::Url;

use super::{CatalogSource, SourceFormat, resolve_location};
use crate::error::{Error, Result, SourceError};

/// Definition documents served over HTTP(S), e.g. raw files from a git forge
#[derive(Debug, Clone)]
pub struct HttpSource {
    url_template: String,
    format: SourceFormat,
    timeout: Duration,
    http: reqwest::Client,
}

impl HttpSource {
    /// Create a source for a URL template containing `{version}`
    pub fn new(url_template: impl Into<String>, format: SourceFormat, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, url_template, format, timeout))
    }

    /// Create a source sharing an existing client
    pub fn with_client(
        http: reqwest::Client,
        url_template: impl Into<String>,
        format: SourceFormat,
        timeout: Duration,
    ) -> Self {
        Self {
            url_template: url_template.into(),
            format,
            timeout,
            http,
        }
    }

    /// The URL template
    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get_bytes(&self, url: Url) -> std::result::Result<Bytes, SourceError> {
        let resp = self.http.get(url).timeout(self.timeout).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status));
        }
        Ok(resp.bytes().await?)
    }
}

impl CatalogSource for HttpSource {
    fn format(&self) -> SourceFormat {
        self.format
    }

    fn location(&self, version: &str) -> String {
        resolve_location(&self.url_template, version)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    async fn fetch(&self, version: &str) -> Result<Bytes> {
        let location = self.location(version);
        let url = Url::parse(&location).map_err(|e| Error::source_unavailable(&location, e))?;
        let bytes = self
            .get_bytes(url)
            .await
            .map_err(|e| Error::source_unavailable(&location, e))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(url = %location, bytes = bytes.len(), "fetched icon source");

        Ok(bytes)
    }
}
