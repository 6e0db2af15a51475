use crate::error::{NsvError, Result};
use serde::Serialize;
use std::fmt;

/// Semantic version increment, ordered by precedence
///
/// `None < Patch < Minor < Major`, so the strongest signal in a history can be
/// found with a simple comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Increment {
    /// Nothing to release
    #[default]
    None,
    /// Bug fixes (x.y.Z)
    Patch,
    /// New features (x.Y.0)
    Minor,
    /// Breaking changes (X.0.0)
    Major,
}

impl Increment {
    /// Apply this increment to a version.
    ///
    /// Build metadata is always dropped. A patch increment on a prerelease
    /// finalises it (`0.2.0-beta.1` becomes `0.2.0`) rather than moving the
    /// patch number; minor and major increments reset the lower components.
    ///
    /// Fails when the component to increment is already `u64::MAX`.
    pub fn apply(&self, version: &semver::Version) -> Result<semver::Version> {
        let mut next = semver::Version::new(version.major, version.minor, version.patch);

        match self {
            Increment::None => {}
            Increment::Patch => {
                if version.pre.is_empty() {
                    next.patch = increment_component(version.patch, "patch", version)?;
                }
            }
            Increment::Minor => {
                next.minor = increment_component(version.minor, "minor", version)?;
                next.patch = 0;
            }
            Increment::Major => {
                next.major = increment_component(version.major, "major", version)?;
                next.minor = 0;
                next.patch = 0;
            }
        }

        Ok(next)
    }
}

fn increment_component(value: u64, component: &str, version: &semver::Version) -> Result<u64> {
    value.checked_add(1).ok_or_else(|| {
        NsvError::version(format!(
            "cannot increment the {} number of '{}' beyond {}",
            component,
            version,
            u64::MAX
        ))
    })
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Increment::None => write!(f, "none"),
            Increment::Patch => write!(f, "patch"),
            Increment::Minor => write!(f, "minor"),
            Increment::Major => write!(f, "major"),
        }
    }
}
