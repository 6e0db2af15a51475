//! Conventional commit detection
//!
//! Scans a history (newest first) and reports the strongest increment it
//! implies, together with where in the history that increment came from.

use crate::config::ConventionalStrategy;
use crate::domain::{CommitRecord, Increment, MatchPosition};

const SEPARATOR: &str = ": ";
const BREAKING_CHANGE: &str = "BREAKING CHANGE";
const BREAKING_FOOTERS: [&str; 2] = ["BREAKING CHANGE: ", "BREAKING-CHANGE: "];

/// Leading type of a conventional commit header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalHeader<'a> {
    /// Text before the first `": "`, as written
    pub leading_type: &'a str,
    /// Byte offset of the separator within the message
    pub separator: usize,
}

impl<'a> ConventionalHeader<'a> {
    /// Locate the leading type in the first line of `message`.
    ///
    /// Returns `None` when the header has no `": "` or nothing precedes it.
    pub fn parse(message: &'a str) -> Option<Self> {
        let header = message.lines().next()?;
        let separator = header.find(SEPARATOR)?;
        if separator == 0 {
            return None;
        }

        Some(ConventionalHeader {
            leading_type: &header[..separator],
            separator,
        })
    }

    /// Whether the type is marked breaking with `!`
    pub fn is_breaking(&self) -> bool {
        self.leading_type.ends_with('!')
    }
}

/// Find a `BREAKING CHANGE: ` or `BREAKING-CHANGE: ` footer on the last line
/// of `message`, returning the byte range of the footer token.
pub fn breaking_footer(message: &str) -> Option<(usize, usize)> {
    let body = message.strip_suffix('\n').unwrap_or(message);
    let idx = body.rfind('\n')?;
    let footer = &body[idx + 1..];

    BREAKING_FOOTERS
        .iter()
        .any(|token| footer.starts_with(token))
        .then(|| (idx + 1, idx + 1 + BREAKING_CHANGE.len()))
}

/// Detect the increment implied by a history of commits.
///
/// The first breaking change found returns immediately with `Major`. Otherwise
/// the newest minor-level commit wins, and patch-level commits only count
/// while no minor-level commit has been seen. Commits that do not follow the
/// convention are skipped.
pub fn detect_increment(
    log: &[CommitRecord],
    strategy: &ConventionalStrategy,
) -> (Increment, Option<MatchPosition>) {
    let mut mode = Increment::None;
    let mut position = None;

    for (i, commit) in log.iter().enumerate() {
        let Some(header) = ConventionalHeader::parse(&commit.message) else {
            continue;
        };

        if header.is_breaking() {
            return (
                Increment::Major,
                Some(MatchPosition::new(i, 0, header.separator)),
            );
        }

        if let Some((start, end)) = breaking_footer(&commit.message) {
            return (Increment::Major, Some(MatchPosition::new(i, start, end)));
        }

        let leading_type = header.leading_type.to_uppercase();
        if strategy.is_major(&leading_type) {
            return (
                Increment::Major,
                Some(MatchPosition::new(i, 0, header.separator)),
            );
        }

        if mode == Increment::Minor {
            continue;
        }

        if strategy.is_minor(&leading_type) {
            mode = Increment::Minor;
            position = Some(MatchPosition::new(i, 0, header.separator));
        } else if strategy.is_patch(&leading_type) {
            mode = Increment::Patch;
            position = Some(MatchPosition::new(i, 0, header.separator));
        }
    }

    (mode, position)
}
