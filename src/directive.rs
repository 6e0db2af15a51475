//! Release directives embedded in commit footers
//!
//! A directive is the last line of a commit message, starting with `NSV:`
//! (any case) and followed by comma or space separated tokens:
//!
//! - `force~major`, `force~minor`, `force~patch`: force that increment
//! - `force~ignore`: suppress the release entirely
//! - `pre`, `pre~alpha`, `pre~beta`, `pre~rc`: release as a prerelease
//!
//! Unknown tokens are ignored.

use crate::domain::{CommitRecord, Increment, MatchPosition, PreReleaseLabel};

const DIRECTIVE_PREFIX: &str = "NSV:";
const PRE: &str = "pre";
const PRE_LABEL: &str = "pre~";
const FORCE: &str = "force~";

/// Parsed release directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    /// Increment forced by the directive. `Some(Increment::None)` means
    /// `force~ignore`.
    pub force: Option<Increment>,
    /// Requested prerelease label
    pub prerelease: Option<PreReleaseLabel>,
}

impl Directive {
    /// Parse the tokens following `NSV:`
    pub fn parse(tokens: &str) -> Self {
        let mut directive = Directive::default();

        for token in tokens
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            if let Some(level) = token.strip_prefix(FORCE) {
                let force = match level {
                    "major" => Increment::Major,
                    "minor" => Increment::Minor,
                    "patch" => Increment::Patch,
                    "ignore" => Increment::None,
                    _ => continue,
                };
                directive.force = Some(force);
            } else if token == PRE {
                directive.prerelease = Some(PreReleaseLabel::Beta);
            } else if let Some(label) = token.strip_prefix(PRE_LABEL) {
                if let Some(label) = PreReleaseLabel::from_directive(label) {
                    directive.prerelease = Some(label);
                }
            }
        }

        directive
    }

    /// Whether the directive suppresses any release
    pub fn is_ignore(&self) -> bool {
        self.force == Some(Increment::None)
    }
}

/// Find the newest directive in a history (newest first).
///
/// Only the last line of a multi-line message is considered. The returned
/// position spans that whole line.
pub fn detect_directive(log: &[CommitRecord]) -> Option<(Directive, MatchPosition)> {
    log.iter().enumerate().find_map(|(i, commit)| {
        let (start, footer) = directive_footer(&commit.message)?;
        let tokens = footer.get(DIRECTIVE_PREFIX.len()..)?;
        Some((
            Directive::parse(tokens.trim()),
            MatchPosition::new(i, start, start + footer.len()),
        ))
    })
}

/// Last line of `message` when it carries a directive, with its byte offset
fn directive_footer(message: &str) -> Option<(usize, &str)> {
    let trimmed = message.trim();
    let offset = message.len() - message.trim_start().len();

    let idx = trimmed.rfind('\n')?;
    let line = &trimmed[idx + 1..];
    let footer = line.trim_start();
    let start = offset + idx + 1 + (line.len() - footer.len());

    let prefix = footer.get(..DIRECTIVE_PREFIX.len())?;
    prefix
        .eq_ignore_ascii_case(DIRECTIVE_PREFIX)
        .then_some((start, footer.trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(messages: &[&str]) -> Vec<CommitRecord> {
        messages
            .iter()
            .enumerate()
            .map(|(i, m)| CommitRecord::new(format!("{:040x}", i), *m))
            .collect()
    }

    #[test]
    fn test_force_major_position() {
        let commits = log(&["fix broken badges on README\nNSV: force~major"]);
        let (directive, pos) = detect_directive(&commits).unwrap();
        assert_eq!(directive.force, Some(Increment::Major));
        assert_eq!(directive.prerelease, None);
        assert_eq!(pos, MatchPosition::new(0, 28, 44));
    }

    #[test]
    fn test_lowercase_prefix_with_prerelease() {
        let commits = log(&["experimental use of a file cache\nnsv:pre,force~major"]);
        let (directive, pos) = detect_directive(&commits).unwrap();
        assert_eq!(directive.force, Some(Increment::Major));
        assert_eq!(directive.prerelease, Some(PreReleaseLabel::Beta));
        assert_eq!(pos, MatchPosition::new(0, 33, 52));
    }

    #[test]
    fn test_position_spans_footer_line() {
        let message = "refactor: rework summary\n\nNsv: force~patch";
        let commits = log(&[message]);
        let (_, pos) = detect_directive(&commits).unwrap();
        assert_eq!(pos.slice(message), Some("Nsv: force~patch"));
    }

    #[test]
    fn test_newest_directive_wins() {
        let commits = log(&[
            "docs: a",
            "feat: b\nNSV: force~patch",
            "fix: c\nNSV: force~major",
        ]);
        let (directive, pos) = detect_directive(&commits).unwrap();
        assert_eq!(directive.force, Some(Increment::Patch));
        assert_eq!(pos.index, 1);
    }

    #[test]
    fn test_single_line_message_is_skipped() {
        assert!(detect_directive(&log(&["NSV: force~major"])).is_none());
    }

    #[test]
    fn test_directive_must_be_last_line() {
        assert!(detect_directive(&log(&["fix: a\nNSV: force~major\nSigned-off-by: someone"])).is_none());
    }

    #[test]
    fn test_short_footer_is_skipped() {
        assert!(detect_directive(&log(&["fix: a\nNS"])).is_none());
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        let commits = log(&["fix: a\nNSV: force~minor\n\n"]);
        let (directive, pos) = detect_directive(&commits).unwrap();
        assert_eq!(directive.force, Some(Increment::Minor));
        assert_eq!(pos, MatchPosition::new(0, 7, 23));
    }

    #[test]
    fn test_prerelease_labels() {
        assert_eq!(
            Directive::parse("pre~alpha").prerelease,
            Some(PreReleaseLabel::Alpha)
        );
        assert_eq!(
            Directive::parse("pre~rc").prerelease,
            Some(PreReleaseLabel::ReleaseCandidate)
        );
        assert_eq!(
            Directive::parse("pre").prerelease,
            Some(PreReleaseLabel::Beta)
        );
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let directive = Directive::parse("force~huge, pre~dev, deploy");
        assert_eq!(directive, Directive::default());
    }

    #[test]
    fn test_comma_with_space_separator() {
        let directive = Directive::parse("pre~rc, force~minor");
        assert_eq!(directive.force, Some(Increment::Minor));
        assert_eq!(directive.prerelease, Some(PreReleaseLabel::ReleaseCandidate));
    }

    #[test]
    fn test_force_ignore() {
        let directive = Directive::parse("force~ignore");
        assert_eq!(directive.force, Some(Increment::None));
        assert!(directive.is_ignore());
        assert!(!Directive::parse("force~patch").is_ignore());
    }

    #[test]
    fn test_prerelease_only_does_not_force() {
        let directive = Directive::parse("pre");
        assert_eq!(directive.force, None);
    }
}
