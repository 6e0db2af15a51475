use crate::domain::{Increment, TagTemplate};

/// Returns the default list of prefixes that trigger a major increment.
///
/// Breaking changes are normally signalled with `!` or a footer, so nothing
/// is listed here unless configured.
fn default_major_prefixes() -> Vec<String> {
    Vec::new()
}

/// Returns the default list of prefixes that trigger a minor increment.
fn default_minor_prefixes() -> Vec<String> {
    vec!["FEAT".to_string()]
}

/// Returns the default list of prefixes that trigger a patch increment.
fn default_patch_prefixes() -> Vec<String> {
    vec!["FIX".to_string()]
}

/// Maps conventional commit types to version increments.
///
/// Prefixes are stored upper-cased and compared against the upper-cased
/// leading type of a commit header. A prefix also matches a scoped type, so
/// `FEAT` matches both `feat` and `feat(search)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalStrategy {
    major: Vec<String>,
    minor: Vec<String>,
    patch: Vec<String>,
}

impl Default for ConventionalStrategy {
    fn default() -> Self {
        ConventionalStrategy {
            major: default_major_prefixes(),
            minor: default_minor_prefixes(),
            patch: default_patch_prefixes(),
        }
    }
}

impl ConventionalStrategy {
    /// Build a strategy where any non-empty list replaces the default for
    /// that level.
    pub fn with_overrides(major: &[String], minor: &[String], patch: &[String]) -> Self {
        let pick = |custom: &[String], default: Vec<String>| {
            let custom = normalise(custom);
            if custom.is_empty() {
                default
            } else {
                custom
            }
        };

        ConventionalStrategy {
            major: pick(major, default_major_prefixes()),
            minor: pick(minor, default_minor_prefixes()),
            patch: pick(patch, default_patch_prefixes()),
        }
    }

    pub fn is_major(&self, leading_type: &str) -> bool {
        contains_prefix(&self.major, leading_type)
    }

    pub fn is_minor(&self, leading_type: &str) -> bool {
        contains_prefix(&self.minor, leading_type)
    }

    pub fn is_patch(&self, leading_type: &str) -> bool {
        contains_prefix(&self.patch, leading_type)
    }

    /// Increment configured for an upper-cased leading type, strongest first
    pub fn increment_for(&self, leading_type: &str) -> Increment {
        if self.is_major(leading_type) {
            Increment::Major
        } else if self.is_minor(leading_type) {
            Increment::Minor
        } else if self.is_patch(leading_type) {
            Increment::Patch
        } else {
            Increment::None
        }
    }
}

fn normalise(prefixes: &[String]) -> Vec<String> {
    prefixes
        .iter()
        .map(|p| p.trim().to_uppercase())
        .filter(|p| !p.is_empty())
        .collect()
}

fn contains_prefix(prefixes: &[String], leading_type: &str) -> bool {
    prefixes.iter().any(|prefix| {
        if leading_type == prefix {
            return true;
        }

        leading_type
            .strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.starts_with('(') && rest.ends_with(')'))
    })
}

/// Options controlling how the next version of a path is resolved
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Path to resolve, relative to the working directory. Empty means the
    /// working directory itself.
    pub path: String,
    /// Template used to format the next tag
    pub template: TagTemplate,
    /// Conventional commit prefixes
    pub strategy: ConventionalStrategy,
}
