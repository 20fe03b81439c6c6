// src/metadata/client.rs

//! HTTP client for the link-local instance metadata service.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;

use super::MetadataSource;
use crate::config::MetadataSettings;
use crate::errors::{HostbootError, Result};

const TOKEN_PATH: &str = "/latest/api/token";
const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";
const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";

/// Talks to the metadata endpoint. Every request is bounded by the
/// configured timeout and never goes through a proxy.
#[derive(Debug, Clone)]
pub struct ImdsClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
    token_ttl: Option<Duration>,
}

impl ImdsClient {
    pub fn new(settings: &MetadataSettings) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(settings.timeout)
            .timeout(settings.timeout)
            .no_proxy()
            .build()
            .map_err(|e| HostbootError::Other(anyhow::anyhow!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            timeout: settings.timeout,
            token_ttl: settings.token_ttl,
        })
    }

    fn unavailable(&self, what: &str, err: reqwest::Error) -> HostbootError {
        if err.is_timeout() {
            HostbootError::MetadataUnavailable(format!(
                "{what}: timed out after {:?}",
                self.timeout
            ))
        } else {
            HostbootError::MetadataUnavailable(format!("{what}: {err}"))
        }
    }

    /// Request an IMDSv2 session token.
    async fn fetch_token(&self, ttl: Duration) -> Result<String> {
        let url = self.endpoint.join(TOKEN_PATH).map_err(|e| {
            HostbootError::MetadataUnavailable(format!("building token URL: {e}"))
        })?;
        let what = format!("PUT {url}");
        debug!(url = %url, ttl_secs = ttl.as_secs(), "requesting metadata session token");

        let resp = self
            .http
            .put(url)
            .header(TOKEN_TTL_HEADER, ttl.as_secs().to_string())
            .send()
            .await
            .map_err(|e| self.unavailable(&what, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(HostbootError::MetadataUnavailable(format!(
                "{what}: HTTP {status}"
            )));
        }

        resp.text().await.map_err(|e| self.unavailable(&what, e))
    }

    /// GET the metadata document and return its body.
    pub async fn get_document(&self) -> Result<String> {
        let what = format!("GET {}", self.endpoint);

        let mut req = self.http.get(self.endpoint.clone());
        if let Some(ttl) = self.token_ttl {
            let token = self.fetch_token(ttl).await?;
            req = req.header(TOKEN_HEADER, token.trim());
        }

        debug!(endpoint = %self.endpoint, "fetching metadata document");
        let resp = req.send().await.map_err(|e| self.unavailable(&what, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(HostbootError::MetadataUnavailable(format!(
                "{what}: HTTP {status}"
            )));
        }

        resp.text().await.map_err(|e| self.unavailable(&what, e))
    }
}

impl MetadataSource for ImdsClient {
    fn fetch_document(&self) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        Box::pin(self.get_document())
    }
}
