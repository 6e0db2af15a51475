use crate::config::ConventionalStrategy;
use crate::conventional::detect_increment;
use crate::directive::{detect_directive, Directive};
use crate::domain::{CommitRecord, Increment, MatchPosition};
use serde::Serialize;

/// Outcome of analysing a history that warrants a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Increment to apply, never `Increment::None`
    pub increment: Increment,
    /// Where the deciding signal was found
    pub position: MatchPosition,
    /// Directive found in the history, if any
    #[serde(skip)]
    pub directive: Directive,
}

/// Decides the increment for a history, giving directives precedence over
/// conventional commits
pub struct VersionAnalyzer {
    strategy: ConventionalStrategy,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(strategy: ConventionalStrategy) -> Self {
        VersionAnalyzer { strategy }
    }

    /// Analyse a history ordered newest first.
    ///
    /// A forced increment from a directive is used as-is along with the
    /// directive's position. `force~ignore` suppresses the release. Without a
    /// forced increment the conventional commit result applies. Returns
    /// `None` when nothing should be released.
    pub fn analyze(&self, log: &[CommitRecord]) -> Option<Analysis> {
        let (directive, directive_position) = match detect_directive(log) {
            Some((directive, position)) => (directive, Some(position)),
            None => (Directive::default(), None),
        };

        // force~ignore skips the release outright, even when conventional
        // commits in the same history would otherwise bump the version.
        if directive.is_ignore() {
            return None;
        }

        let (increment, position) = match (directive.force, directive_position) {
            (Some(force), Some(position)) => (force, Some(position)),
            _ => detect_increment(log, &self.strategy),
        };

        match (increment, position) {
            (Increment::None, _) | (_, None) => None,
            (increment, Some(position)) => Some(Analysis {
                increment,
                position,
                directive,
            }),
        }
    }
}
