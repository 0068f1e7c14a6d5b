//! Version arithmetic over published versions
//!
//! Versions are ordered by semver precedence, never lexically. Strings that
//! do not parse as versions are ignored.

use node_semver::{Range, Version};

fn satisfying<'a>(
    versions: &'a [String],
    range: Option<&'a Range>,
) -> impl Iterator<Item = (Version, &'a String)> + 'a {
    versions.iter().filter_map(move |raw| {
        let range = range?;
        let version = Version::parse(raw).ok()?;
        range.satisfies(&version).then_some((version, raw))
    })
}

/// Lowest version satisfying the range, or `None`
pub fn min_satisfying(versions: &[String], range: Option<&Range>) -> Option<String> {
    satisfying(versions, range)
        .min_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, raw)| raw.clone())
}

/// Highest version satisfying the range, or `None`
pub fn max_satisfying(versions: &[String], range: Option<&Range>) -> Option<String> {
    satisfying(versions, range)
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, raw)| raw.clone())
}

/// Returns true when the version carries a prerelease tag
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre_release.is_empty()
}
