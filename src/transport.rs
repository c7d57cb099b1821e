//! HTTP transport for the BBC gateways
//!
//! The BBC exposes two distinct hosts: a call gateway serving JSON schedule
//! documents and a download gateway serving programme imagery. Both are
//! reached by plain path concatenation, no query parameters and no
//! authentication.
//!
//! Services depend on the [`Transport`] trait rather than on a concrete
//! client, so tests can substitute deterministic stubs. [`HttpTransport`]
//! is the production implementation.
//!
//! # Example
//!
//! ```no_run
//! use bbcschedule::{HttpTransport, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new()?;
//!     let bytes = transport
//!         .fetch_bytes("/radio4/programmes/schedules/fm/today.json")
//!         .await?;
//!     println!("{} bytes", bytes.len());
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Default call gateway serving JSON schedule documents
pub const DEFAULT_CALL_GATEWAY: &str = "http://www.bbc.co.uk";

/// Default download gateway serving programme imagery
pub const DEFAULT_DOWNLOAD_GATEWAY: &str = "http://ichef.bbci.co.uk";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "bbcschedule/0.1";

/// Asynchronous access to the two BBC gateways
///
/// Both operations issue a single GET and never retry. Success requires
/// HTTP status 200; a 404 surfaces as [`Error::NotFound`], any other
/// status as [`Error::HttpStatus`], and transport-level failures as
/// [`Error::Network`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the body at `service_path` on the call gateway into memory
    async fn fetch_bytes(&self, service_path: &str) -> Result<Bytes>;

    /// Stream the body at `service_path` on the download gateway to a
    /// temporary local file
    ///
    /// The returned handle owns the file; it is removed when dropped.
    async fn fetch_to_file(&self, service_path: &str) -> Result<NamedTempFile>;
}

/// Production transport backed by a shared `reqwest::Client`
///
/// One connection pool per instance; the client carries no other state.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    call_gateway: Url,
    download_gateway: Url,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the transport
    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    /// Get the call gateway base URL
    pub fn call_gateway(&self) -> &Url {
        &self.call_gateway
    }

    /// Get the download gateway base URL
    pub fn download_gateway(&self) -> &Url {
        &self.download_gateway
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    async fn get_checked(&self, base: &Url, service_path: &str) -> Result<reqwest::Response> {
        let url = join_url(base, service_path)?;

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::NOT_FOUND => Err(Error::NotFound(service_path.to_string())),
            status => Err(Error::HttpStatus(status)),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_bytes(&self, service_path: &str) -> Result<Bytes> {
        let response = self.get_checked(&self.call_gateway, service_path).await?;
        Ok(response.bytes().await?)
    }

    async fn fetch_to_file(&self, service_path: &str) -> Result<NamedTempFile> {
        let response = self
            .get_checked(&self.download_gateway, service_path)
            .await?;

        let tmp = NamedTempFile::new()?;
        let mut file = tokio::fs::File::create(tmp.path()).await?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;

        Ok(tmp)
    }
}

/// Join a gateway base URL with a service path
///
/// Accepts paths with or without a leading slash; the gateway bases have
/// no path component of their own.
fn join_url(base: &Url, service_path: &str) -> Result<Url> {
    Ok(base.join(service_path)?)
}

/// Builder for configuring an [`HttpTransport`]
#[derive(Debug)]
pub struct TransportBuilder {
    client: Option<Client>,
    call_gateway: String,
    download_gateway: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for TransportBuilder {
    fn default() -> Self {
        Self {
            client: None,
            call_gateway: DEFAULT_CALL_GATEWAY.to_string(),
            download_gateway: DEFAULT_DOWNLOAD_GATEWAY.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TransportBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    ///
    /// Useful for sharing connection pools or custom proxy settings.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the call gateway base URL
    pub fn call_gateway(mut self, url: impl Into<String>) -> Self {
        self.call_gateway = url.into();
        self
    }

    /// Set the download gateway base URL
    pub fn download_gateway(mut self, url: impl Into<String>) -> Self {
        self.download_gateway = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the transport
    pub fn build(self) -> Result<HttpTransport> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(HttpTransport {
            client,
            call_gateway: Url::parse(&self.call_gateway)?,
            download_gateway: Url::parse(&self.download_gateway)?,
            timeout: self.timeout,
        })
    }
}
