//! # Tag Ordering
//!
//! Tags are ordered by semantic-version precedence, not by creation time and
//! not by string comparison: `v1.10.0` ranks above `v1.9.0`, and `v2.0.0`
//! ranks above `v1.9.9`.
//!
//! ## Parsing
//!
//! A tag is read as a version after dropping an optional leading `v`/`V` (and
//! a `refs/tags/` prefix, should one be present). Strict semver is tried
//! first; short forms such as `v1` or `v1.2` are padded with zeros so they
//! still take part in the ordering.
//!
//! ## Ordering
//!
//! - Version tags compare by semver precedence; equal versions (`v1.0.0` and
//!   `1.0.0`) fall back to comparing the tag text.
//! - Tags that are not versions at all sort before every version tag, in
//!   lexicographic order, so they never win the "latest" slot while a
//!   version tag exists.

use std::cmp::Ordering;

use semver::Version;

/// Parse a tag into a semantic version, if it looks like one.
pub fn parse_tag_version(tag: &str) -> Option<Version> {
    let tag = tag.strip_prefix("refs/tags/").unwrap_or(tag);
    let version_str = tag
        .strip_prefix('v')
        .or_else(|| tag.strip_prefix('V'))
        .unwrap_or(tag);

    if let Ok(version) = Version::parse(version_str) {
        return Some(version);
    }

    // Lenient form: MAJOR or MAJOR.MINOR, numeric components only
    let components: Vec<&str> = version_str.split('.').collect();
    if components.is_empty()
        || components.len() > 2
        || components
            .iter()
            .any(|c| c.is_empty() || !c.chars().all(|ch| ch.is_ascii_digit()))
    {
        return None;
    }

    let major = components[0].parse().ok()?;
    let minor = match components.get(1) {
        Some(minor) => minor.parse().ok()?,
        None => 0,
    };
    Some(Version::new(major, minor, 0))
}

/// Compare two tags by version precedence.
pub fn compare_tags(a: &str, b: &str) -> Ordering {
    match (parse_tag_version(a), parse_tag_version(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// The tags of one dependency, ascending by version precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    /// Build a tag set from tags in any order. Duplicates are dropped.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tags: Vec<String> = tags
            .into_iter()
            .map(Into::into)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort_by(|a, b| compare_tags(a, b));
        tags.dedup();
        Self { tags }
    }

    /// The highest tag, or `None` when there are no tags at all.
    pub fn latest(&self) -> Option<&str> {
        self.tags.last().map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_version() {
        assert_eq!(parse_tag_version("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_tag_version("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_tag_version("V4.0.1"), Some(Version::new(4, 0, 1)));
        assert_eq!(
            parse_tag_version("refs/tags/v1.2.3"),
            Some(Version::new(1, 2, 3))
        );
        assert_eq!(
            parse_tag_version("v2.1.3-alpha"),
            Some(Version::parse("2.1.3-alpha").unwrap())
        );
    }

    #[test]
    fn test_parse_tag_version_lenient() {
        assert_eq!(parse_tag_version("v1.2"), Some(Version::new(1, 2, 0)));
        assert_eq!(parse_tag_version("7"), Some(Version::new(7, 0, 0)));
        assert_eq!(parse_tag_version("v1.2.3.4"), None);
        assert_eq!(parse_tag_version("v1..2"), None);
        assert_eq!(parse_tag_version("release"), None);
        assert_eq!(parse_tag_version("v"), None);
        assert_eq!(parse_tag_version(""), None);
    }

    #[test]
    fn test_tagset_orders_numerically() {
        let tags = TagSet::new(["v1.9.0", "v1.10.0", "v2.0.0", "v1.9.9"]);

        assert_eq!(tags.latest(), Some("v2.0.0"));
        assert_eq!(
            tags.as_slice(),
            &["v1.9.0", "v1.9.9", "v1.10.0", "v2.0.0"]
        );
    }

    #[test]
    fn test_tagset_prerelease_below_release() {
        let tags = TagSet::new(["v1.0.0", "v1.0.0-rc.1", "v0.9.0"]);
        assert_eq!(tags.as_slice(), &["v0.9.0", "v1.0.0-rc.1", "v1.0.0"]);
    }

    #[test]
    fn test_tagset_non_version_tags_sort_first() {
        let tags = TagSet::new(["nightly", "v0.1.0", "alpha-build"]);
        assert_eq!(tags.as_slice(), &["alpha-build", "nightly", "v0.1.0"]);
        assert_eq!(tags.latest(), Some("v0.1.0"));
    }

    #[test]
    fn test_tagset_only_non_version_tags() {
        let tags = TagSet::new(["stable", "edge"]);
        assert_eq!(tags.latest(), Some("stable"));
    }

    #[test]
    fn test_tagset_empty_has_no_latest() {
        let tags = TagSet::new(Vec::<String>::new());
        assert!(tags.is_empty());
        assert_eq!(tags.latest(), None);
    }

    #[test]
    fn test_tagset_drops_blank_and_duplicate_tags() {
        let tags = TagSet::new(["v1.0.0", "", "v1.0.0", "  "]);
        assert_eq!(tags.len(), 1);
        assert!(tags.contains("v1.0.0"));
    }

    #[test]
    fn test_compare_tags_equal_versions_break_on_text() {
        assert_eq!(compare_tags("1.0.0", "v1.0.0"), Ordering::Less);
        assert_eq!(compare_tags("v1.0.0", "v1.0.0"), Ordering::Equal);
    }
}
