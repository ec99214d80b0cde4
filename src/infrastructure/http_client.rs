//! HTTP transport for the collector
//!
//! [`PageFetcher`] is the seam between the collector and the network. The
//! production implementation wraps a `reqwest` client with the site's fixed
//! User-Agent; tests substitute an in-memory fetcher.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;
use url::Url;

use crate::infrastructure::collector_error::CollectorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

impl PageRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    /// Form-encoded POST.
    pub fn post_form(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body.into()),
        }
    }

    /// Stable cache key over method, URL and body.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.method.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.url.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.body.as_deref().unwrap_or_default().as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn parsed_url(&self) -> Result<Url, CollectorError> {
        Url::parse(&self.url).map_err(|e| CollectorError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }

    /// Host used to scope parallelism and pacing.
    pub fn domain(&self) -> String {
        self.parsed_url()
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Send the request and return the body of a 2xx response.
    async fn fetch(&self, request: &PageRequest) -> Result<String, CollectorError>;
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
            follow_redirects: true,
        }
    }
}

/// `reqwest`-backed fetcher. Rate limiting lives in the collector.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, CollectorError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| CollectorError::transport("<client>", format!("invalid user agent: {e}")))?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| CollectorError::transport("<client>", e))?;

        Ok(Self { client, config })
    }

    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, request: &PageRequest) -> Result<String, CollectorError> {
        let url = request.parsed_url()?;
        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(request.body.clone().unwrap_or_default()),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                CollectorError::timeout(&request.url, self.config.timeout)
            } else {
                CollectorError::transport(&request.url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::HttpStatus {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| CollectorError::transport(&request.url, e))?;
        debug!("Fetched {} {} ({} chars)", request.method, request.url, text.len());
        Ok(text)
    }
}
