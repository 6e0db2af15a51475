//! Prerelease labels for semantic versioning
//!
//! A prerelease is a label with a numeric counter, such as `beta.2`. Directives
//! may only request `alpha`, `beta` or `rc`, but labels read back from existing
//! tags can be anything, so unknown labels are kept verbatim.
//! According to semver.org: https://semver.org/#spec-item-9

use crate::error::{NsvError, Result};
use serde::Serialize;
use std::fmt;

/// Prerelease label (alpha, beta, rc, or one found on an existing tag)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum PreReleaseLabel {
    /// Alpha prerelease
    Alpha,
    /// Beta prerelease, the default for a bare `pre` directive
    Beta,
    /// Release candidate
    ReleaseCandidate,
    /// Label read from a tag that no directive can produce
    Custom(String),
}

impl PreReleaseLabel {
    /// Resolve the label named after `pre~` in a directive.
    ///
    /// Returns `None` for anything other than `alpha`, `beta` or `rc`.
    pub fn from_directive(token: &str) -> Option<Self> {
        match token {
            "alpha" => Some(PreReleaseLabel::Alpha),
            "beta" => Some(PreReleaseLabel::Beta),
            "rc" => Some(PreReleaseLabel::ReleaseCandidate),
            _ => None,
        }
    }

    /// Label string as it appears in a version
    pub fn as_str(&self) -> &str {
        match self {
            PreReleaseLabel::Alpha => "alpha",
            PreReleaseLabel::Beta => "beta",
            PreReleaseLabel::ReleaseCandidate => "rc",
            PreReleaseLabel::Custom(s) => s,
        }
    }
}

impl From<&str> for PreReleaseLabel {
    fn from(s: &str) -> Self {
        PreReleaseLabel::from_directive(s).unwrap_or_else(|| PreReleaseLabel::Custom(s.to_string()))
    }
}

impl From<PreReleaseLabel> for String {
    fn from(label: PreReleaseLabel) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for PreReleaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Prerelease identifier with an optional counter
///
/// # Examples
/// - "alpha" -> PreRelease { label: Alpha, counter: None }
/// - "beta.1" -> PreRelease { label: Beta, counter: Some(1) }
/// - "rc.3" -> PreRelease { label: ReleaseCandidate, counter: Some(3) }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    /// The prerelease label
    pub label: PreReleaseLabel,
    /// Counter following the label, if it was numeric
    pub counter: Option<u64>,
}

impl PreRelease {
    /// Create a new prerelease
    pub fn new(label: PreReleaseLabel, counter: Option<u64>) -> Self {
        PreRelease { label, counter }
    }

    /// The first prerelease in a sequence, `label.1`
    pub fn first(label: PreReleaseLabel) -> Self {
        PreRelease::new(label, Some(1))
    }

    /// Read the prerelease part of an existing version.
    ///
    /// Everything before the first `.` is the label. The remainder becomes the
    /// counter only when it is a plain number; otherwise the counter is unset
    /// and the sequence restarts from 1 on [`PreRelease::next`].
    pub fn parse(s: &str) -> Self {
        let (label, counter) = match s.split_once('.') {
            Some((label, rest)) => (label, rest.parse::<u64>().ok()),
            None => (s, None),
        };

        PreRelease::new(PreReleaseLabel::from(label), counter)
    }

    /// Continue the sequence under the same label
    ///
    /// # Examples
    /// ```ignore
    /// let next = PreRelease::parse("beta.1").next()?;
    /// assert_eq!(next.counter, Some(2));
    /// ```
    pub fn next(&self) -> Result<Self> {
        let counter = self.counter.unwrap_or(0).checked_add(1).ok_or_else(|| {
            NsvError::version(format!("prerelease '{}' cannot be incremented", self))
        })?;

        Ok(PreRelease {
            label: self.label.clone(),
            counter: Some(counter),
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if let Some(counter) = self.counter {
            write!(f, ".{}", counter)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_directive() {
        assert_eq!(
            PreReleaseLabel::from_directive("alpha"),
            Some(PreReleaseLabel::Alpha)
        );
        assert_eq!(
            PreReleaseLabel::from_directive("beta"),
            Some(PreReleaseLabel::Beta)
        );
        assert_eq!(
            PreReleaseLabel::from_directive("rc"),
            Some(PreReleaseLabel::ReleaseCandidate)
        );
    }

    #[test]
    fn test_label_from_directive_rejects_unknown() {
        assert_eq!(PreReleaseLabel::from_directive("dev"), None);
        assert_eq!(PreReleaseLabel::from_directive("BETA"), None);
        assert_eq!(PreReleaseLabel::from_directive(""), None);
    }

    #[test]
    fn test_label_from_tag_keeps_custom() {
        assert_eq!(
            PreReleaseLabel::from("staging"),
            PreReleaseLabel::Custom("staging".to_string())
        );
        assert_eq!(PreReleaseLabel::from("rc"), PreReleaseLabel::ReleaseCandidate);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(PreReleaseLabel::Alpha.to_string(), "alpha");
        assert_eq!(PreReleaseLabel::ReleaseCandidate.to_string(), "rc");
        assert_eq!(PreReleaseLabel::Custom("dev".to_string()).to_string(), "dev");
    }

    #[test]
    fn test_parse_with_counter() {
        let pr = PreRelease::parse("beta.1");
        assert_eq!(pr.label, PreReleaseLabel::Beta);
        assert_eq!(pr.counter, Some(1));
    }

    #[test]
    fn test_parse_without_counter() {
        let pr = PreRelease::parse("alpha");
        assert_eq!(pr.label, PreReleaseLabel::Alpha);
        assert_eq!(pr.counter, None);
    }

    #[test]
    fn test_parse_non_numeric_counter() {
        let pr = PreRelease::parse("rc.x");
        assert_eq!(pr.label, PreReleaseLabel::ReleaseCandidate);
        assert_eq!(pr.counter, None);
        assert_eq!(pr.next().unwrap().to_string(), "rc.1");
    }

    #[test]
    fn test_parse_dotted_remainder_restarts() {
        assert_eq!(PreRelease::parse("beta.1.2").next().unwrap().to_string(), "beta.1");
    }

    #[test]
    fn test_next_increments_counter() {
        assert_eq!(PreRelease::parse("beta.1").next().unwrap().to_string(), "beta.2");
        assert_eq!(PreRelease::parse("rc.99").next().unwrap().to_string(), "rc.100");
    }

    #[test]
    fn test_next_counter_overflow() {
        let pr = PreRelease::parse(&format!("beta.{}", u64::MAX));
        assert_eq!(pr.counter, Some(u64::MAX));
        assert!(matches!(pr.next(), Err(NsvError::Version(_))));
    }

    #[test]
    fn test_first() {
        assert_eq!(PreRelease::first(PreReleaseLabel::Alpha).to_string(), "alpha.1");
    }

    #[test]
    fn test_display_without_counter() {
        assert_eq!(PreRelease::parse("alpha").to_string(), "alpha");
    }
}
