use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure produced by fetching or resolving release data from GitHub.
///
/// `GithubApi` covers everything that means "the upstream API returned
/// something invalid or was unreachable". `MissingReleasesFile` and
/// `TagNotSemver` are legitimate states of the latest release itself and get
/// a different HTTP mapping, so they are separate variants rather than tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "type")]
pub enum FetchError {
    #[serde(rename = "GITHUB_API_ERROR")]
    #[error("github api error ({tag}): {message}")]
    GithubApi {
        tag: GithubApiErrorTag,
        message: String,
    },

    #[serde(rename = "MISSING_RELEASES_FILE")]
    #[error("latest release has no RELEASES file")]
    MissingReleasesFile,

    #[serde(rename = "TAG_NAME_DOESNT_FOLLOW_SEMVER_FORMAT")]
    #[error("release tag doesnt follow the semantic versioning format")]
    TagNotSemver,
}

/// Which upstream call went wrong inside a `FetchError::GithubApi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GithubApiErrorTag {
    InvalidResponseStatus,
    InvalidResponseData,
    GetReleasesFileFailed,
    GetAssetFailed,
}

impl fmt::Display for GithubApiErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidResponseStatus => write!(f, "INVALID_RESPONSE_STATUS"),
            Self::InvalidResponseData => write!(f, "INVALID_RESPONSE_DATA"),
            Self::GetReleasesFileFailed => write!(f, "GET_RELEASES_FILE_FAILED"),
            Self::GetAssetFailed => write!(f, "GET_ASSET_FAILED"),
        }
    }
}

impl FetchError {
    pub fn github_api(tag: GithubApiErrorTag, message: impl Into<String>) -> Self {
        Self::GithubApi {
            tag,
            message: message.into(),
        }
    }

    pub fn invalid_response_data(message: impl Into<String>) -> Self {
        Self::github_api(GithubApiErrorTag::InvalidResponseData, message)
    }
}
