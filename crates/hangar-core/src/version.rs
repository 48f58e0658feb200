use std::fmt;
use std::str::FromStr;

/// A parsed application version.
///
/// Two versions are equal iff all three components match; pre-release or
/// build suffixes never participate because [`Version::parse`] discards them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("no semantic version found in: {input}")]
    NotSemver { input: String },
}

impl Version {
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extract the first `v?<major>.<minor>.<patch>` occurrence from `text`.
    ///
    /// The match is deliberately not anchored: trailing content after the
    /// third component (pre-release tags, extra dotted groups, package-name
    /// noise) is ignored, so `"v1.0.3-beta"` parses as 1.0.3 and
    /// `"1.2.3.4.5"` parses as 1.2.3. GitHub tags and update-client version
    /// segments both rely on this laxness.
    ///
    /// # Errors
    /// Returns [`VersionParseError::NotSemver`] when no such substring exists
    /// anywhere in the input.
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        let bytes = text.as_bytes();
        (0..bytes.len())
            .find_map(|start| match_at(bytes, start))
            .ok_or_else(|| VersionParseError::NotSemver {
                input: text.to_string(),
            })
    }
}

fn match_at(bytes: &[u8], mut at: usize) -> Option<Version> {
    if bytes[at] == b'v' {
        at += 1;
    }
    let (major, at) = take_number(bytes, at)?;
    let at = take_dot(bytes, at)?;
    let (minor, at) = take_number(bytes, at)?;
    let at = take_dot(bytes, at)?;
    let (patch, _) = take_number(bytes, at)?;
    Some(Version::new(major, minor, patch))
}

fn take_number(bytes: &[u8], at: usize) -> Option<(u64, usize)> {
    let end = bytes[at..]
        .iter()
        .position(|byte| !byte.is_ascii_digit())
        .map_or(bytes.len(), |offset| at + offset);
    if end == at {
        return None;
    }
    // The run is pure ASCII digits, so the slice is valid UTF-8. A run too
    // large for u64 simply fails to match at this offset.
    let digits = std::str::from_utf8(&bytes[at..end]).ok()?;
    digits.parse().ok().map(|number| (number, end))
}

fn take_dot(bytes: &[u8], at: usize) -> Option<usize> {
    (bytes.get(at) == Some(&b'.')).then_some(at + 1)
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}
