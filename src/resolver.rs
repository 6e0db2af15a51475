//! Resolves the next version for a path within a repository
//!
//! Ties the pieces together: locate the latest tag for the path, read the
//! history since that tag, decide the increment, and bump.

use crate::analyzer::VersionAnalyzer;
use crate::config::ResolveOptions;
use crate::domain::{CommitRecord, Increment, MatchPosition, Tag};
use crate::error::Result;
use crate::git::{Repository, TagQuery};
use crate::version::bump_version;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, instrument};

const FIRST_VERSION: &str = "0.0.0";
const V_PREFIXED_FIRST_VERSION: &str = "v0.0.0";

/// Files marking a project whose ecosystem expects `v`-prefixed tags
const V_PREFIXED_MARKERS: &[&str] = &["go.mod"];

/// Where a path sits within a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonorepoContext {
    /// Prefix for tags of this path; empty at the repository root
    pub tag_prefix: String,
    /// Subtree that history is scoped to; empty at the repository root
    pub log_path: String,
}

impl MonorepoContext {
    /// Resolve `path` (relative to `cwd`, empty for `cwd` itself)
    pub fn resolve<R: Repository + ?Sized>(repo: &R, cwd: &Path, path: &str) -> Result<Self> {
        let target = if path.is_empty() {
            cwd.to_path_buf()
        } else {
            cwd.join(path)
        };

        let relative = repo.relative_path(&target)?;
        Ok(Self::from_relative(&relative))
    }

    /// Build from a path relative to the repository root
    pub fn from_relative(relative: &str) -> Self {
        let segments: Vec<&str> = relative
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();

        match segments.last() {
            Some(last) => MonorepoContext {
                tag_prefix: last.to_string(),
                log_path: segments.join("/"),
            },
            None => MonorepoContext {
                tag_prefix: String::new(),
                log_path: String::new(),
            },
        }
    }

    /// Version assumed when no release exists yet.
    ///
    /// `0.0.0`, or `v0.0.0` when the project directory (under `workdir`)
    /// contains a marker file such as `go.mod`, then prefixed with
    /// `tag_prefix/` for monorepo paths.
    pub fn first_version(&self, workdir: Option<&Path>) -> String {
        let v_prefixed = workdir
            .map(|root| root.join(&self.log_path))
            .is_some_and(|dir| is_v_prefixed_project(&dir));

        let version = if v_prefixed {
            V_PREFIXED_FIRST_VERSION
        } else {
            FIRST_VERSION
        };

        if self.tag_prefix.is_empty() {
            version.to_string()
        } else {
            format!("{}/{}", self.tag_prefix, version)
        }
    }
}

fn is_v_prefixed_project(dir: &Path) -> bool {
    V_PREFIXED_MARKERS
        .iter()
        .any(|marker| dir.join(marker).is_file())
}

/// The next release for a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedNext {
    /// History scanned, newest first
    pub log: Vec<CommitRecord>,
    /// Subtree the history was scoped to; empty at the repository root
    pub log_dir: String,
    /// Where the deciding signal was found
    pub position: MatchPosition,
    /// Increment that was applied
    pub increment: Increment,
    /// Latest release, or the assumed first version
    pub prev_tag: String,
    /// Next tag, rendered through the configured template
    pub tag: String,
}

impl ResolvedNext {
    /// Commit that decided the increment
    pub fn matched_commit(&self) -> Option<&CommitRecord> {
        self.log.get(self.position.index)
    }
}

/// Work out the next version for `opts.path`.
///
/// Returns `Ok(None)` when the history since the latest release contains
/// nothing that warrants a release.
#[instrument(skip(repo, opts), fields(path = %opts.path))]
pub fn resolve_next<R: Repository + ?Sized>(
    repo: &R,
    cwd: &Path,
    opts: &ResolveOptions,
) -> Result<Option<ResolvedNext>> {
    let ctx = MonorepoContext::resolve(repo, cwd, &opts.path)?;
    debug!(
        prefix = %ctx.tag_prefix,
        log_path = %ctx.log_path,
        template = opts.template.source(),
        "resolved context"
    );

    let latest = repo.latest_tag(&TagQuery::new(&ctx.tag_prefix))?;
    let log = repo.log(&ctx.log_path, latest.as_deref())?;

    let analyzer = VersionAnalyzer::new(opts.strategy.clone());
    let Some(analysis) = analyzer.analyze(&log) else {
        info!(latest = ?latest, commits = log.len(), "nothing to release");
        return Ok(None);
    };

    let workdir = repo.workdir();
    let prev_tag = latest.unwrap_or_else(|| ctx.first_version(workdir.as_deref()));
    let mut base = Tag::parse(&prev_tag)?;

    if let Some(label) = &analysis.directive.prerelease {
        if !base.is_prerelease_with_label(label) {
            let query = TagQuery::prerelease(&ctx.tag_prefix, label.as_str());
            if let Some(pre_tag) = repo.latest_tag(&query)? {
                debug!(%pre_tag, "continuing prerelease sequence");
                base = Tag::parse(&pre_tag)?;
            }
        }
    }

    let tag = bump_version(&base, &opts.template, analysis.increment, &analysis.directive)?;
    info!(%prev_tag, %tag, increment = %analysis.increment, "resolved next version");

    Ok(Some(ResolvedNext {
        log,
        log_dir: ctx.log_path,
        position: analysis.position,
        increment: analysis.increment,
        prev_tag,
        tag,
    }))
}
