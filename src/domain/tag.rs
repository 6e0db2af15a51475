use crate::domain::prerelease::PreReleaseLabel;
use crate::error::{NsvError, Result};
use serde::Serialize;

const V_PREFIX: char = 'v';

/// A parsed semantic version tag such as `v1.2.3` or `search/0.2.0-beta.1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// Everything before the last `/`, without the slash
    pub prefix: String,
    /// Strict semantic version, without any `v`
    pub semver: String,
    /// Version segment exactly as written, `v` included
    pub version: String,
    /// The full tag as written
    pub raw: String,
    /// Prerelease component of the version, empty if none
    pub pre: String,
    /// Build metadata component of the version, empty if none
    pub metadata: String,
}

impl Tag {
    /// Parse a raw tag.
    ///
    /// The segment after the last `/` must be a strict semantic version,
    /// optionally preceded by a lowercase `v`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (prefix, version) = match raw.rfind('/') {
            Some(idx) => (&raw[..idx], &raw[idx + 1..]),
            None => ("", raw),
        };

        let semv = version.strip_prefix(V_PREFIX).unwrap_or(version);
        let parsed = semver::Version::parse(semv).map_err(|e| {
            NsvError::version(format!("tag '{}' is not a semantic version: {}", raw, e))
        })?;

        Ok(Tag {
            prefix: prefix.to_string(),
            semver: semv.to_string(),
            version: version.to_string(),
            raw: raw.to_string(),
            pre: parsed.pre.to_string(),
            metadata: parsed.build.to_string(),
        })
    }

    /// Strict semantic version of this tag
    pub fn semantic_version(&self) -> Result<semver::Version> {
        semver::Version::parse(&self.semver).map_err(|e| {
            NsvError::version(format!("tag '{}' is not a semantic version: {}", self.raw, e))
        })
    }

    /// Build the tag for a new version, keeping this tag's prefix and `v`
    pub fn bump(&self, next: &semver::Version) -> Tag {
        let version = if self.version.starts_with(V_PREFIX) {
            format!("{}{}", V_PREFIX, next)
        } else {
            next.to_string()
        };

        let raw = if self.prefix.is_empty() {
            version.clone()
        } else {
            format!("{}/{}", self.prefix, version)
        };

        Tag {
            prefix: self.prefix.clone(),
            semver: next.to_string(),
            version,
            raw,
            pre: next.pre.to_string(),
            metadata: next.build.to_string(),
        }
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Whether the prerelease component starts with `label`
    pub fn is_prerelease_with_label(&self, label: &PreReleaseLabel) -> bool {
        self.is_prerelease() && self.pre.starts_with(label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let tag = Tag::parse("0.1.0").unwrap();
        assert_eq!(tag.prefix, "");
        assert_eq!(tag.semver, "0.1.0");
        assert_eq!(tag.version, "0.1.0");
        assert_eq!(tag.raw, "0.1.0");
        assert!(!tag.is_prerelease());
    }

    #[test]
    fn test_parse_v_prefixed() {
        let tag = Tag::parse("v1.2.3").unwrap();
        assert_eq!(tag.semver, "1.2.3");
        assert_eq!(tag.version, "v1.2.3");
    }

    #[test]
    fn test_parse_monorepo_prefix() {
        let tag = Tag::parse("component/v0.2.0").unwrap();
        assert_eq!(tag.prefix, "component");
        assert_eq!(tag.semver, "0.2.0");
        assert_eq!(tag.version, "v0.2.0");
        assert_eq!(tag.raw, "component/v0.2.0");
    }

    #[test]
    fn test_parse_nested_prefix_splits_on_last_slash() {
        let tag = Tag::parse("services/search/1.4.0").unwrap();
        assert_eq!(tag.prefix, "services/search");
        assert_eq!(tag.version, "1.4.0");
    }

    #[test]
    fn test_parse_prerelease_and_metadata() {
        let tag = Tag::parse("v0.2.0-beta.1+build.5").unwrap();
        assert_eq!(tag.pre, "beta.1");
        assert_eq!(tag.metadata, "build.5");
        assert!(tag.is_prerelease());
    }

    #[test]
    fn test_parse_rejects_non_strict_versions() {
        assert!(Tag::parse("1.2").is_err());
        assert!(Tag::parse("release-1.2.3").is_err());
        assert!(Tag::parse("V1.2.3").is_err());
        assert!(Tag::parse("01.2.3").is_err());
        assert!(Tag::parse("").is_err());
        assert!(Tag::parse("search/").is_err());
    }

    #[test]
    fn test_parse_error_names_tag() {
        let err = Tag::parse("latest").unwrap_err();
        assert!(err.to_string().contains("latest"));
    }

    #[test]
    fn test_bump_preserves_prefix_and_v() {
        let tag = Tag::parse("component/v0.2.0").unwrap();
        let next = tag.bump(&semver::Version::new(0, 2, 1));
        assert_eq!(next.raw, "component/v0.2.1");
        assert_eq!(next.version, "v0.2.1");
        assert_eq!(next.semver, "0.2.1");
        assert_eq!(next.prefix, "component");
    }

    #[test]
    fn test_bump_without_v() {
        let tag = Tag::parse("0.9.9").unwrap();
        let next = tag.bump(&semver::Version::new(0, 10, 0));
        assert_eq!(next.raw, "0.10.0");
    }

    #[test]
    fn test_bump_carries_prerelease() {
        let tag = Tag::parse("v1.2.3").unwrap();
        let next = tag.bump(&semver::Version::parse("1.3.0-alpha.1").unwrap());
        assert_eq!(next.raw, "v1.3.0-alpha.1");
        assert_eq!(next.pre, "alpha.1");
    }

    #[test]
    fn test_bump_round_trips_through_parse() {
        let tag = Tag::parse("search/v2.0.0").unwrap();
        let next = tag.bump(&semver::Version::new(2, 1, 0));
        assert_eq!(Tag::parse(&next.raw).unwrap(), next);
    }

    #[test]
    fn test_prerelease_with_label() {
        let tag = Tag::parse("0.2.0-beta.1").unwrap();
        assert!(tag.is_prerelease_with_label(&PreReleaseLabel::Beta));
        assert!(!tag.is_prerelease_with_label(&PreReleaseLabel::Alpha));

        let stable = Tag::parse("0.2.0").unwrap();
        assert!(!stable.is_prerelease_with_label(&PreReleaseLabel::Beta));
    }
}
