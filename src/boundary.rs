use crate::git::Repository;
use std::fmt;

/// Warnings about repository state that may affect the computed version.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// History is truncated, so the latest tag or commits may be missing
    ShallowClone,
    /// Nothing since the latest release warrants a new version
    NoReleasableHistory { path: String },
}

impl BoundaryWarning {
    /// Warnings that describe an expected outcome rather than a problem
    pub fn is_informational(&self) -> bool {
        matches!(self, BoundaryWarning::NoReleasableHistory { .. })
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::ShallowClone => {
                write!(
                    f,
                    "Repository is a shallow clone, tags and commits may be missing (fetch with --unshallow)"
                )
            }
            BoundaryWarning::NoReleasableHistory { path } => {
                let path = if path.is_empty() { "." } else { path.as_str() };
                write!(f, "No releasable changes found for '{}'", path)
            }
        }
    }
}

/// Warnings that apply to the repository as a whole
pub fn check_repository<R: Repository + ?Sized>(repo: &R) -> Vec<BoundaryWarning> {
    let mut warnings = Vec::new();
    if repo.is_shallow() {
        warnings.push(BoundaryWarning::ShallowClone);
    }
    warnings
}
