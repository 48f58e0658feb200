use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, warn};

use hangar_core::{FetchError, Version};

use crate::server::AppState;

const SUPPORTED_PLATFORM: &str = "win32";

/// Routes consumed by the desktop update client.
///
/// The static `win32`/`RELEASES` segments take precedence over the dynamic
/// download route at the same positions.
pub fn update_routes() -> Router<AppState> {
    Router::new()
        .route("/update/win32/:version/RELEASES", get(get_feed_manifest))
        .route("/update/:platform/:version/:file", get(get_download_file))
}

/// Serve the cached update feed.
///
/// The version path segment is validated for well-formedness only; clients
/// on any version receive the same latest feed.
async fn get_feed_manifest(
    State(state): State<AppState>,
    Path(version): Path<String>,
) -> Response {
    if version.is_empty() {
        return (StatusCode::BAD_REQUEST, "Version param was not supplied.").into_response();
    }
    if Version::parse(&version).is_err() {
        debug!("Rejecting feed request for malformed version {version:?}");
        return (
            StatusCode::BAD_REQUEST,
            "Version param doesnt follow the Semantic Versioning format.",
        )
            .into_response();
    }

    let cached = state.cache.latest().await;
    match &cached.outcome {
        Ok(release) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            release.feed_manifest.clone(),
        )
            .into_response(),
        Err(error) => fetch_error_response(error),
    }
}

/// Redirect an asset request to a freshly resolved download URL.
async fn get_download_file(
    State(state): State<AppState>,
    Path((platform, version, file)): Path<(String, String, String)>,
) -> Response {
    // Request validation happens before any cache or upstream interaction.
    if version.is_empty() {
        return (StatusCode::BAD_REQUEST, "NO_VERSION_PARAM_SUPPLIED").into_response();
    }
    if platform.is_empty() {
        return (StatusCode::BAD_REQUEST, "NO_PLATFORM_PARAM_SUPPLIED").into_response();
    }
    if file.is_empty() {
        return (StatusCode::BAD_REQUEST, "NO_FILE_PARAM_SUPPLIED").into_response();
    }
    if platform != SUPPORTED_PLATFORM {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "ONLY_PLATFORM_WIN32_CURRENTLY_SUPPORTED",
        )
            .into_response();
    }

    let cached = state.cache.latest().await;
    let release = match &cached.outcome {
        Ok(release) => release,
        Err(error) => return fetch_error_response(error),
    };

    let Some(asset) = release.find_asset(&file) else {
        debug!("No asset named {file:?} in release {}", release.version);
        return (StatusCode::BAD_REQUEST, "ASSET_NOT_FOUND").into_response();
    };

    match state.source.resolve_download_url(asset).await {
        Ok(download_url) => redirect_response(&download_url),
        Err(error) => fetch_error_response(&error),
    }
}

/// Map a cached or resolution failure onto the client-facing response.
///
/// Exhaustive on purpose: a new error kind must pick its mapping here
/// instead of falling into a catch-all.
fn fetch_error_response(error: &FetchError) -> Response {
    match error {
        FetchError::GithubApi { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error.clone())).into_response()
        }
        FetchError::MissingReleasesFile => (
            StatusCode::BAD_REQUEST,
            "Latest release has no RELEASES file.",
        )
            .into_response(),
        FetchError::TagNotSemver => (
            StatusCode::BAD_REQUEST,
            "Release tag doesnt follow the Semantic Versioning format.",
        )
            .into_response(),
    }
}

fn redirect_response(download_url: &str) -> Response {
    match HeaderValue::from_str(download_url) {
        Ok(location) => {
            let mut response = StatusCode::FOUND.into_response();
            response.headers_mut().insert(header::LOCATION, location);
            response
        }
        Err(_) => {
            warn!("Resolved download URL is not a usable location header: {download_url}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "GET_RELEASE_FAILED - INVALID_RESPONSE_URL",
            )
                .into_response()
        }
    }
}
