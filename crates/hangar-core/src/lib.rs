//! Core logic for the Hangar update server.
//!
//! This crate is independent of the HTTP surface and process configuration:
//! - Lax semantic-version extraction for release tags and client paths.
//! - Validation of the untrusted GitHub release payload into typed assets.
//! - The two-step latest-release fetch and download-URL resolution.
//! - The in-memory release cache refreshed by a background poller.

mod cache;
mod error;
mod github;
mod release;
mod version;

/// Release cache handle, cached fetch outcome, and the production interval.
pub use cache::{CachedOutcome, DEFAULT_POLL_INTERVAL, ReleaseCache};
/// Fetch failure taxonomy shared by the poller and the route handlers.
pub use error::{FetchError, GithubApiErrorTag};
/// GitHub API client, the source trait it implements, and the shared client.
pub use github::{GithubClient, ReleaseSource, build_http_client};
/// Release and asset models plus untrusted-payload normalization.
pub use release::{
    Asset, FEED_MANIFEST_NAME, Release, ReleaseMetadata, assets_from_value, find_feed_asset,
    release_metadata_from_value,
};
/// Version triple and its lax parser.
pub use version::{Version, VersionParseError};
