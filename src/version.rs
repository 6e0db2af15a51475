use crate::directive::Directive;
use crate::domain::{Increment, PreRelease, Tag, TagTemplate};
use crate::error::{NsvError, Result};

/// Computes the next semantic version from a base tag.
///
/// Rules, in order:
/// 1. A major increment on a `0.y.z` version is demoted to minor.
/// 2. A forced increment from a directive replaces the detected one.
/// 3. A prerelease base is always patched, which finalises it.
/// 4. A requested prerelease continues the base's sequence (`beta.1` becomes
///    `beta.2`) or starts a new one at `label.1`.
pub fn next_version(
    base: &Tag,
    increment: Increment,
    directive: &Directive,
) -> Result<semver::Version> {
    let current = base.semantic_version()?;

    let mut increment = increment;
    if increment == Increment::Major && current.major == 0 {
        increment = Increment::Minor;
    }

    if let Some(force) = directive.force {
        increment = force;
    }

    if base.is_prerelease() {
        increment = Increment::Patch;
    }

    let mut next = increment.apply(&current)?;

    if let Some(label) = &directive.prerelease {
        let pre = if base.is_prerelease() {
            PreRelease::parse(&base.pre).next()?
        } else {
            PreRelease::first(label.clone())
        };

        next.pre = semver::Prerelease::new(&pre.to_string()).map_err(|e| {
            NsvError::version(format!("invalid prerelease '{}': {}", pre, e))
        })?;
    }

    Ok(next)
}

/// Bump `base` and render the resulting tag through `template`
pub fn bump_version(
    base: &Tag,
    template: &TagTemplate,
    increment: Increment,
    directive: &Directive,
) -> Result<String> {
    let next = next_version(base, increment, directive)?;
    Ok(template.render(&base.bump(&next)))
}
