//! Command workflows
//!
//! Keeps the business logic of each command out of main.rs so it can be
//! driven programmatically against any [Repository].

use crate::boundary::{check_repository, BoundaryWarning};
use crate::config::{ConventionalStrategy, ResolveOptions};
use crate::domain::{CommitTemplate, MessageTemplate, Tag, TagTemplate};
use crate::error::{NsvError, Result};
use crate::git::{NewCommit, NewTag, Repository};
use crate::hooks::{HookContext, HookExecutor};
use crate::resolver::{resolve_next, ResolvedNext};
use std::path::Path;
use tracing::{info, instrument};

/// Outcome of resolving every requested path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Paths with something to release, in request order
    pub results: Vec<ResolvedNext>,
    /// Non-fatal issues found along the way
    pub warnings: Vec<BoundaryWarning>,
}

impl Resolution {
    /// Next tag of every releasable path
    pub fn tags(&self) -> Vec<String> {
        self.results.iter().map(|next| next.tag.clone()).collect()
    }
}

/// Options for [tag_all]
#[derive(Debug, Clone, Copy)]
pub struct TagOptions<'a> {
    /// Annotation template
    pub message: &'a MessageTemplate,
    /// Shell command run before each tag is created
    pub hook: Option<&'a str>,
    /// Skip the hook and tag creation
    pub dry_run: bool,
}

/// Options for [patch_all]
#[derive(Debug, Clone, Copy)]
pub struct PatchOptions<'a> {
    /// Commit message template
    pub message: &'a CommitTemplate,
    /// Shell command that patches files with the next version
    pub hook: &'a str,
    /// Discard the patched files instead of committing them
    pub dry_run: bool,
    /// CI marker exposed to the message as `SkipPipelineTag`
    pub skip_pipeline_tag: &'a str,
}

/// Fail with every path that does not exist relative to `cwd`
pub fn check_paths_exist(cwd: &Path, paths: &[String]) -> Result<()> {
    let missing: Vec<String> = paths
        .iter()
        .filter(|path| !cwd.join(path).exists())
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(NsvError::MissingPaths(missing))
    }
}

/// Resolve the next version of each path.
///
/// No paths means the working directory. Paths are validated before the
/// repository is touched.
#[instrument(skip(repo, template, strategy))]
pub fn resolve_all<R: Repository + ?Sized>(
    repo: &R,
    cwd: &Path,
    paths: &[String],
    template: &TagTemplate,
    strategy: &ConventionalStrategy,
) -> Result<Resolution> {
    check_paths_exist(cwd, paths)?;

    let mut resolution = Resolution {
        results: Vec::new(),
        warnings: check_repository(repo),
    };

    let paths = if paths.is_empty() {
        vec![String::new()]
    } else {
        paths.to_vec()
    };

    for path in paths {
        let opts = ResolveOptions {
            path,
            template: template.clone(),
            strategy: strategy.clone(),
        };

        match resolve_next(repo, cwd, &opts)? {
            Some(next) => resolution.results.push(next),
            None => resolution
                .warnings
                .push(BoundaryWarning::NoReleasableHistory { path: opts.path }),
        }
    }

    Ok(resolution)
}

/// Create an annotated tag for each resolved version, running the hook
/// first. Returns the tag names in order, including on a dry run.
///
/// Each tag targets the newest scanned commit.
#[instrument(skip_all, fields(count = results.len(), dry_run = opts.dry_run))]
pub fn tag_all<R: Repository + ?Sized>(
    repo: &R,
    results: &[ResolvedNext],
    opts: &TagOptions<'_>,
) -> Result<Vec<String>> {
    let mut tags = Vec::with_capacity(results.len());

    for next in results {
        if opts.dry_run {
            info!(tag = %next.tag, "dry run, skipping tag creation");
            tags.push(next.tag.clone());
            continue;
        }

        if let Some(hook) = opts.hook {
            HookExecutor::execute(hook, &HookContext::from(next))?;
        }

        let target = next
            .log
            .first()
            .ok_or_else(|| NsvError::tag(format!("no commit to tag for '{}'", next.tag)))?;
        let impersonate = next.matched_commit().unwrap_or(target);
        let message = opts.message.render(&next.tag, &next.prev_tag);

        repo.create_tag(&NewTag {
            name: &next.tag,
            target: &target.hash,
            impersonate: &impersonate.hash,
            message: &message,
        })?;

        info!(tag = %next.tag, target = %target.abbrev_hash, "created tag");
        tags.push(next.tag.clone());
    }

    Ok(tags)
}

/// Run the hook for each resolved version and commit the files it changed.
/// Returns the tag of every resolved version.
///
/// Files that already had uncommitted changes before the hook ran are never
/// staged or discarded. A dry run still runs the hook, then discards what it
/// changed.
#[instrument(skip_all, fields(count = results.len(), dry_run = opts.dry_run))]
pub fn patch_all<R: Repository + ?Sized>(
    repo: &R,
    results: &[ResolvedNext],
    opts: &PatchOptions<'_>,
) -> Result<Vec<String>> {
    let mut tags = Vec::with_capacity(results.len());

    for next in results {
        let before = repo.changed_files()?;
        HookExecutor::execute(opts.hook, &HookContext::from(next))?;

        let patched: Vec<String> = repo
            .changed_files()?
            .into_iter()
            .filter(|path| !before.contains(path))
            .collect();
        tags.push(next.tag.clone());

        if patched.is_empty() {
            info!(tag = %next.tag, "hook changed no files, nothing to commit");
            continue;
        }

        if opts.dry_run {
            repo.restore_files(&patched)?;
            info!(tag = %next.tag, files = patched.len(), "dry run, discarded patched files");
            continue;
        }

        let signer = next
            .matched_commit()
            .or_else(|| next.log.first())
            .ok_or_else(|| NsvError::tag(format!("no commit to sign for '{}'", next.tag)))?;
        let message = opts
            .message
            .render(&next.tag, &next.prev_tag, opts.skip_pipeline_tag);

        let hash = repo.commit_files(&NewCommit {
            paths: &patched,
            impersonate: &signer.hash,
            message: &message,
        })?;

        info!(tag = %next.tag, %hash, files = patched.len(), "committed patched files");
    }

    Ok(tags)
}

/// Render `tag` through `template`
pub fn format_tag(tag: &str, template: &TagTemplate) -> Result<String> {
    let tag = Tag::parse(tag)?;
    Ok(template.render(&tag))
}
