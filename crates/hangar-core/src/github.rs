use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::error::{FetchError, GithubApiErrorTag};
use crate::release::{Asset, Release, find_feed_asset, release_metadata_from_value};

const GITHUB_API_BASE: &str = "https://api.github.com";
const OCTET_STREAM: &str = "application/octet-stream";
const APP_USER_AGENT: &str = "hangar/0.1.0";

// The reference behavior had no request timeout at all; 30s keeps a wedged
// upstream from pinning poller and request tasks indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client used for every upstream call.
///
/// # Errors
/// Returns an error when the underlying TLS backend cannot be initialized.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Upstream release provider, as seen by the cache and the route handlers.
///
/// The production implementation is [`GithubClient`]; tests substitute an
/// in-memory source.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch and validate the latest published release.
    async fn fetch_latest_release(&self) -> Result<Release, FetchError>;

    /// Resolve an asset to its short-lived download URL.
    ///
    /// Resolved URLs expire quickly, so every call is a fresh upstream round
    /// trip; nothing here is cached.
    async fn resolve_download_url(&self, asset: &Asset) -> Result<String, FetchError>;
}

/// GitHub Releases API client for a single owner/repository pair.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    owner: String,
    repository: String,
    token: String,
}

impl GithubClient {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        owner: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            owner: owner.into(),
            repository: repository.into(),
            token: token.into(),
        }
    }

    async fn fetch_feed_manifest(&self, url: &str) -> Result<String, FetchError> {
        let failed = |message: String| {
            FetchError::github_api(GithubApiErrorTag::GetReleasesFileFailed, message)
        };

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, OCTET_STREAM)
            .send()
            .await
            .map_err(|error| failed(format!("REQUEST_FAILED - URL: {url} - {error}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(failed(format!(
                "INVALID_STATUS - STATUS: {} URL: {url}",
                status.as_u16()
            )));
        }

        let content = response
            .text()
            .await
            .map_err(|_| failed(format!("INVALID_CONTENT - URL: {url}")))?;
        if content.is_empty() {
            return Err(failed(format!("INVALID_CONTENT - URL: {url}")));
        }

        Ok(content)
    }
}

#[async_trait]
impl ReleaseSource for GithubClient {
    async fn fetch_latest_release(&self) -> Result<Release, FetchError> {
        let url = format!(
            "{GITHUB_API_BASE}/repos/{}/{}/releases/latest",
            self.owner, self.repository
        );
        debug!("Fetching latest release from {url}");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|error| {
                FetchError::github_api(
                    GithubApiErrorTag::InvalidResponseStatus,
                    format!("REQUEST_FAILED - {error}"),
                )
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::github_api(
                GithubApiErrorTag::InvalidResponseStatus,
                format!("STATUS: {}", status.as_u16()),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| FetchError::invalid_response_data("RESPONSE_IS_NOT_AN_OBJECT"))?;
        let metadata = release_metadata_from_value(&body)?;

        let feed_asset = find_feed_asset(&metadata.assets)?;
        let feed_manifest = self.fetch_feed_manifest(&feed_asset.url).await?;

        Ok(Release {
            version: metadata.version,
            feed_manifest,
            assets: metadata.assets,
        })
    }

    async fn resolve_download_url(&self, asset: &Asset) -> Result<String, FetchError> {
        debug!("Resolving download url for asset {}", asset.name);

        let response = self
            .http
            .get(&asset.url)
            .bearer_auth(&self.token)
            .header(ACCEPT, OCTET_STREAM)
            .send()
            .await
            .map_err(|error| {
                FetchError::github_api(
                    GithubApiErrorTag::GetAssetFailed,
                    format!("REQUEST_FAILED - {error}"),
                )
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::github_api(
                GithubApiErrorTag::GetAssetFailed,
                format!("INVALID_RESPONSE_STATUS - RESPONSE_STATUS: {}", status.as_u16()),
            ));
        }

        // GitHub serves asset metadata at a stable endpoint that redirects to
        // a time-limited storage URL; after the client has followed the
        // redirect chain, the response URL is that storage location.
        Ok(response.url().as_str().to_string())
    }
}
