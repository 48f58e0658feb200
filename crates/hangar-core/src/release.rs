use log::debug;
use serde_json::Value;

use crate::error::FetchError;
use crate::version::Version;

/// Name of the asset holding the update feed consumed by Squirrel.Windows
/// clients. A release without it cannot serve updates at all.
pub const FEED_MANIFEST_NAME: &str = "RELEASES";

/// A named file attached to a release.
///
/// `url` is GitHub's asset-metadata endpoint, not a direct download link;
/// resolving it to a short-lived storage URL is a separate upstream call
/// (see `ReleaseSource::resolve_download_url`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub url: String,
}

/// The most recent published release, as of the last successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: Version,
    pub feed_manifest: String,
    pub assets: Vec<Asset>,
}

impl Release {
    /// Look up an asset by its exact display name.
    #[must_use]
    pub fn find_asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

/// Version and asset list extracted from a "latest release" response body,
/// before the feed manifest content has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMetadata {
    pub version: Version,
    pub assets: Vec<Asset>,
}

/// Validate the untrusted "latest release" JSON body.
///
/// The body is inspected field by field rather than deserialized into a
/// typed struct: presence and type of every field must be checked explicitly
/// because the upstream payload is not under our control.
///
/// # Errors
/// `GithubApi(InvalidResponseData)` when the body is not an object, has no
/// usable `tag_name`, or has a missing/malformed `assets` field;
/// `TagNotSemver` when `tag_name` is present but not semver-shaped.
pub fn release_metadata_from_value(body: &Value) -> Result<ReleaseMetadata, FetchError> {
    let object = body
        .as_object()
        .ok_or_else(|| FetchError::invalid_response_data("RESPONSE_IS_NOT_AN_OBJECT"))?;

    let tag_name = object
        .get("tag_name")
        .and_then(Value::as_str)
        .filter(|tag| !tag.is_empty())
        .ok_or_else(|| FetchError::invalid_response_data("MISSING_TAG_NAME"))?;

    let version = Version::parse(tag_name).map_err(|_| FetchError::TagNotSemver)?;
    let assets = assets_from_value(object.get("assets"))?;

    Ok(ReleaseMetadata { version, assets })
}

/// Normalize the `assets` field of a release object.
///
/// Entries that are not objects or lack a string `name`/`url` are dropped,
/// not fatal: a release with zero usable assets is still a release. Only a
/// missing or structurally wrong `assets` field fails the whole response.
///
/// # Errors
/// `GithubApi(InvalidResponseData)` when the field is absent, not a
/// collection, or a non-array collection.
pub fn assets_from_value(value: Option<&Value>) -> Result<Vec<Asset>, FetchError> {
    let Some(value) = value else {
        return Err(FetchError::invalid_response_data("NO_ASSETS_PROPERTY_FOUND"));
    };

    match value {
        Value::Array(entries) => Ok(entries
            .iter()
            .filter_map(|entry| {
                let asset = asset_from_entry(entry);
                if asset.is_none() {
                    debug!("Dropping malformed asset entry: {entry}");
                }
                asset
            })
            .collect()),
        Value::Object(_) => Err(FetchError::invalid_response_data(
            "ASSETS_PROPERTY_IS_NOT_AN_ARRAY",
        )),
        _ => Err(FetchError::invalid_response_data("NO_ASSETS_PROPERTY_FOUND")),
    }
}

/// Locate the feed-manifest asset in a normalized asset list.
///
/// # Errors
/// `MissingReleasesFile` when no asset carries the exact feed-manifest name,
/// however many other assets the release has.
pub fn find_feed_asset(assets: &[Asset]) -> Result<&Asset, FetchError> {
    assets
        .iter()
        .find(|asset| asset.name == FEED_MANIFEST_NAME)
        .ok_or(FetchError::MissingReleasesFile)
}

fn asset_from_entry(entry: &Value) -> Option<Asset> {
    let object = entry.as_object()?;
    let name = object.get("name")?.as_str()?;
    let url = object.get("url")?.as_str()?;
    Some(Asset {
        name: name.to_string(),
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Release, assets_from_value, release_metadata_from_value};
    use crate::error::{FetchError, GithubApiErrorTag};
    use crate::version::Version;

    fn invalid_data_message(error: &FetchError) -> &str {
        match error {
            FetchError::GithubApi {
                tag: GithubApiErrorTag::InvalidResponseData,
                message,
            } => message,
            other => panic!("expected InvalidResponseData, got {other:?}"),
        }
    }

    #[test]
    fn normalizes_every_well_formed_asset() {
        let value = json!([
            { "name": "RELEASES", "url": "https://api.github.com/assets/1" },
            { "name": "MyApp-1.2.3-full.nupkg", "url": "https://api.github.com/assets/2" },
            { "name": "MyApp-Setup.exe", "url": "https://api.github.com/assets/3" },
        ]);

        let assets = assets_from_value(Some(&value)).expect("normalize assets");
        assert_eq!(assets.len(), 3);
        assert_eq!(assets[0].name, "RELEASES");
        assert_eq!(assets[2].url, "https://api.github.com/assets/3");
    }

    #[test]
    fn drops_malformed_entries_without_failing() {
        let value = json!([
            "not-an-object",
            { "name": "missing-url.nupkg" },
            { "name": 42, "url": "https://api.github.com/assets/1" },
            { "name": "good.nupkg", "url": "https://api.github.com/assets/2" },
        ]);

        let assets = assets_from_value(Some(&value)).expect("normalize assets");
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "good.nupkg");
    }

    #[test]
    fn empty_asset_list_is_not_an_error() {
        let assets = assets_from_value(Some(&json!([]))).expect("normalize assets");
        assert!(assets.is_empty());
    }

    #[test]
    fn missing_assets_field_is_invalid_response_data() {
        let error = assets_from_value(None).expect_err("must fail");
        assert_eq!(invalid_data_message(&error), "NO_ASSETS_PROPERTY_FOUND");

        let error = assets_from_value(Some(&json!(null))).expect_err("must fail");
        assert_eq!(invalid_data_message(&error), "NO_ASSETS_PROPERTY_FOUND");

        let error = assets_from_value(Some(&json!("assets"))).expect_err("must fail");
        assert_eq!(invalid_data_message(&error), "NO_ASSETS_PROPERTY_FOUND");
    }

    #[test]
    fn non_array_collection_is_invalid_response_data() {
        let error = assets_from_value(Some(&json!({ "name": "RELEASES" }))).expect_err("must fail");
        assert_eq!(
            invalid_data_message(&error),
            "ASSETS_PROPERTY_IS_NOT_AN_ARRAY"
        );
    }

    #[test]
    fn release_metadata_reads_tag_and_assets() {
        let body = json!({
            "tag_name": "v2.14.0",
            "assets": [
                { "name": "RELEASES", "url": "https://api.github.com/assets/1" },
            ],
        });

        let metadata = release_metadata_from_value(&body).expect("parse metadata");
        assert_eq!(metadata.version, Version::new(2, 14, 0));
        assert_eq!(metadata.assets.len(), 1);
    }

    #[test]
    fn non_object_body_is_invalid_response_data() {
        let error = release_metadata_from_value(&json!(null)).expect_err("must fail");
        assert_eq!(invalid_data_message(&error), "RESPONSE_IS_NOT_AN_OBJECT");

        let error = release_metadata_from_value(&json!([1, 2, 3])).expect_err("must fail");
        assert_eq!(invalid_data_message(&error), "RESPONSE_IS_NOT_AN_OBJECT");
    }

    #[test]
    fn missing_or_empty_tag_name_is_invalid_response_data() {
        let error = release_metadata_from_value(&json!({ "assets": [] })).expect_err("must fail");
        assert_eq!(invalid_data_message(&error), "MISSING_TAG_NAME");

        let error = release_metadata_from_value(&json!({ "tag_name": "", "assets": [] }))
            .expect_err("must fail");
        assert_eq!(invalid_data_message(&error), "MISSING_TAG_NAME");

        let error = release_metadata_from_value(&json!({ "tag_name": 7, "assets": [] }))
            .expect_err("must fail");
        assert_eq!(invalid_data_message(&error), "MISSING_TAG_NAME");
    }

    #[test]
    fn non_semver_tag_is_its_own_error_kind() {
        let body = json!({ "tag_name": "nightly", "assets": [] });
        assert_eq!(
            release_metadata_from_value(&body).expect_err("must fail"),
            FetchError::TagNotSemver
        );
    }

    #[test]
    fn missing_feed_asset_is_reported_whatever_else_the_release_has() {
        let assets = vec![
            super::Asset {
                name: "MyApp-1.2.3-full.nupkg".to_string(),
                url: "https://api.github.com/assets/1".to_string(),
            },
            super::Asset {
                name: "MyApp-Setup.exe".to_string(),
                url: "https://api.github.com/assets/2".to_string(),
            },
            super::Asset {
                name: "releases".to_string(),
                url: "https://api.github.com/assets/3".to_string(),
            },
        ];

        assert_eq!(
            super::find_feed_asset(&assets).expect_err("must fail"),
            FetchError::MissingReleasesFile
        );
        assert!(super::find_feed_asset(&[]).is_err());
    }

    #[test]
    fn feed_asset_is_found_by_its_exact_name() {
        let assets = vec![super::Asset {
            name: "RELEASES".to_string(),
            url: "https://api.github.com/assets/1".to_string(),
        }];

        let asset = super::find_feed_asset(&assets).expect("find feed asset");
        assert_eq!(asset.url, "https://api.github.com/assets/1");
    }

    #[test]
    fn find_asset_matches_exact_names_only() {
        let release = Release {
            version: Version::new(1, 2, 3),
            feed_manifest: "feed".to_string(),
            assets: vec![
                super::Asset {
                    name: "RELEASES".to_string(),
                    url: "https://api.github.com/assets/1".to_string(),
                },
                super::Asset {
                    name: "MyApp-1.2.3-full.nupkg".to_string(),
                    url: "https://api.github.com/assets/2".to_string(),
                },
            ],
        };

        assert!(release.find_asset("RELEASES").is_some());
        assert!(release.find_asset("releases").is_none());
        assert!(release.find_asset("MyApp-1.2.3-full").is_none());
    }
}
