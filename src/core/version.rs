use crate::domain::ports::ReleaseSource;
use crate::utils::error::{Result, SetupError};
use regex::Regex;
use std::sync::OnceLock;

pub const RELEASES_REPO: &str = "kong/go-apiops";

// Largest integer a version component may hold and still round-trip through JSON.
const MAX_SAFE_COMPONENT: u64 = (1 << 53) - 1;

fn coerce_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|[^\d])(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?(?:$|[^\d])")
            .expect("version pattern is valid")
    })
}

/// Pulls the first `major[.minor[.patch]]` out of free text and pads it to a triple.
///
/// Pre-release and build suffixes are dropped, so `1.8.0-beta2` becomes `1.8.0`.
/// Digits are kept verbatim; leading zeros are left for validation to reject.
pub fn coerce(input: &str) -> Option<String> {
    let caps = coerce_pattern().captures(input)?;
    let part = |i: usize| caps.get(i).map_or("0", |m| m.as_str());
    Some(format!("{}.{}.{}", part(1), part(2), part(3)))
}

/// Coerces `input` and checks the result is a valid semantic version.
pub fn normalize(input: &str) -> Result<String> {
    let invalid = || SetupError::InvalidVersion {
        version: input.to_string(),
    };

    let coerced = coerce(input).ok_or_else(invalid)?;
    let parsed = semver::Version::parse(&coerced).map_err(|_| invalid())?;
    if [parsed.major, parsed.minor, parsed.patch]
        .iter()
        .any(|c| *c > MAX_SAFE_COMPONENT)
    {
        return Err(invalid());
    }

    Ok(parsed.to_string())
}

pub fn strip_tag_prefix(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Resolves the requested version, asking the release source only when none was given.
pub async fn resolve_version<R: ReleaseSource + ?Sized>(
    requested: &str,
    source: &R,
) -> Result<String> {
    let requested = requested.trim();
    let raw = if requested.is_empty() {
        tracing::debug!("No version requested, looking up the latest release");
        let releases = source.list_releases().await?;
        let latest = releases.first().ok_or_else(|| SetupError::NoReleases {
            repo: RELEASES_REPO.to_string(),
        })?;
        tracing::debug!("Latest release tag: {}", latest.tag_name);
        strip_tag_prefix(&latest.tag_name).to_string()
    } else {
        requested.to_string()
    };

    normalize(&raw)
}
