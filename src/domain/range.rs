//! Range targets as declared in bower.json
//!
//! Handles targets like:
//! - Strict: `1.2.3`
//! - Caret / tilde: `^1.2.3`, `~1.2.3`
//! - Comparators and sets: `>=1.0.0 <2.0.0`, `1.x || 2.x`
//! - Wildcard: `*`

use node_semver::{Range, Version};

/// Parses a target into a range.
///
/// Invalid targets yield `None`; such a package never satisfies any version.
pub fn parse_range(target: &str) -> Option<Range> {
    Range::parse(target.trim()).ok()
}

/// Detects the decorating prefix character of a target.
///
/// Returns an empty string for invalid ranges, the `*` wildcard, bare
/// versions (`1.2.0`) and targets starting with a digit or wildcard letter.
pub fn detect_range_char(target: &str, range: Option<&Range>) -> String {
    if range.is_none() || target == "*" {
        return String::new();
    }

    let bare = Version::parse(target).ok().map(|v| v.to_string());
    if bare.as_deref() == Some(target) {
        return String::new();
    }

    match target.chars().next() {
        Some(c) if !c.is_ascii_digit() && !matches!(c, 'x' | 'X' | '*') => c.to_string(),
        _ => String::new(),
    }
}
