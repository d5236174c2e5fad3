use std::time::Duration;

use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::models::{ApiConfig, DownloadRequest, ResolutionResponse};

const APPLICATION_JSON: &str = "application/json";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to connect to {url}. Error: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch video: Status code {status}\n{body}")]
    Service { status: StatusCode, body: String },

    #[error("Failed to parse response JSON or missing fields.\nError: {0}")]
    ResponseFormat(String),

    #[error("Failed to download file from {url}.\nStatus code: {status}")]
    DownloadRejected { url: String, status: StatusCode },

    #[error("Download failed: {0}")]
    Stream(#[source] reqwest::Error),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Direct media location handed back by the instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub url: String,
    pub filename: String,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self { client, config })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Asks the instance to turn a source URL into a direct media link.
    ///
    /// Exactly one POST is made; nothing is retried.
    pub async fn resolve(
        &self,
        instance: &str,
        request: &DownloadRequest,
    ) -> Result<ResolutionResult> {
        let response = self
            .client
            .post(instance)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .timeout(self.timeout())
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Connection {
                url: instance.to_string(),
                source: e,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Connection {
            url: instance.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(ApiError::Service { status, body });
        }

        parse_resolution(&body)
    }

    /// Opens the media URL for streaming.
    /// Returns (total_size, stream); the stream owns the response.
    pub async fn download_file_stream(
        &self,
        download_url: &str,
    ) -> Result<(Option<u64>, BoxStream<'static, Result<bytes::Bytes>>)> {
        let response = self
            .client
            .get(download_url)
            .send()
            .await
            .map_err(|e| ApiError::Connection {
                url: download_url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::DownloadRejected {
                url: download_url.to_string(),
                status,
            });
        }

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::Stream).boxed();

        Ok((total_size, stream))
    }
}

fn parse_resolution(body: &str) -> Result<ResolutionResult> {
    let parsed: ResolutionResponse =
        serde_json::from_str(body).map_err(|e| ApiError::ResponseFormat(e.to_string()))?;

    if let Some(status) = &parsed.status {
        debug!(status = %status, "instance response status");
    }

    Url::parse(&parsed.url)
        .map_err(|e| ApiError::ResponseFormat(format!("invalid url {:?}: {}", parsed.url, e)))?;

    Ok(ResolutionResult {
        url: parsed.url,
        filename: parsed.filename,
    })
}
