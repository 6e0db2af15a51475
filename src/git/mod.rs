//! Git operations abstraction layer
//!
//! The [Repository] trait covers everything nsv needs from version control:
//! finding the latest release tag, reading history, creating local tags and
//! committing patched files.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! ```rust
//! # use nsv::git::{Repository, TagQuery};
//! # fn example<R: Repository>(repo: &R) -> nsv::Result<()> {
//! let latest = repo.latest_tag(&TagQuery::new("search"))?;
//! let history = repo.log("search", latest.as_deref())?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{CommitRecord, Tag};
use crate::error::Result;
use regex::Regex;
use std::path::{Path, PathBuf};

const VERSION_GLOB: &str = "*.*.*";

/// Selects which tags count when looking for the latest release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    /// Monorepo prefix; tags must start with `prefix/`. Empty matches every
    /// tag.
    pub prefix: String,
    /// Shell glob the version segment of a tag must match
    pub glob: String,
}

impl TagQuery {
    /// Latest release of any kind for `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        TagQuery {
            prefix: prefix.into(),
            glob: VERSION_GLOB.to_string(),
        }
    }

    /// Latest prerelease carrying `label` for `prefix`
    pub fn prerelease(prefix: impl Into<String>, label: &str) -> Self {
        TagQuery {
            prefix: prefix.into(),
            glob: format!("{}-{}*", VERSION_GLOB, label),
        }
    }

    /// Compile the query for matching many tags
    pub fn matcher(&self) -> TagMatcher {
        TagMatcher {
            prefix: (!self.prefix.is_empty()).then(|| format!("{}/", self.prefix)),
            glob: glob_to_regex(&self.glob),
        }
    }

    /// Whether a raw tag name passes the prefix filter and glob
    pub fn matches(&self, raw: &str) -> bool {
        self.matcher().is_match(raw)
    }
}

/// A [TagQuery] with its glob compiled
#[derive(Debug, Clone)]
pub struct TagMatcher {
    prefix: Option<String>,
    glob: Option<Regex>,
}

impl TagMatcher {
    pub fn is_match(&self, raw: &str) -> bool {
        if let Some(prefix) = &self.prefix {
            if !raw.starts_with(prefix.as_str()) {
                return false;
            }
        }

        let version = raw.rsplit('/').next().unwrap_or(raw);
        self.glob.as_ref().is_some_and(|re| re.is_match(version))
    }
}

/// Translate a shell glob (`*` and `?` only) into an anchored regex
fn glob_to_regex(glob: &str) -> Option<Regex> {
    let escaped = regex::escape(glob);
    let pattern = escaped.replace(r"\*", ".*").replace(r"\?", ".");
    Regex::new(&format!("^{}$", pattern)).ok()
}

/// An annotated tag to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTag<'a> {
    /// Tag name
    pub name: &'a str,
    /// Hash of the commit to tag
    pub target: &'a str,
    /// Hash of the commit whose committer signs the tag when no git identity
    /// is configured
    pub impersonate: &'a str,
    /// Annotation
    pub message: &'a str,
}

/// A commit of working tree changes on top of HEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCommit<'a> {
    /// Paths relative to the repository root to stage
    pub paths: &'a [String],
    /// Hash of the commit whose committer authors this one when no git
    /// identity is configured
    pub impersonate: &'a str,
    pub message: &'a str,
}

/// Pick the highest semantic version among `tags` that matches `query`.
///
/// Tags that are not strict semantic versions are skipped.
pub fn select_latest_tag<I, S>(tags: I, query: &TagQuery) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let matcher = query.matcher();

    tags.into_iter()
        .filter(|raw| matcher.is_match(raw.as_ref()))
        .filter_map(|raw| {
            let tag = Tag::parse(raw.as_ref()).ok()?;
            let version = tag.semantic_version().ok()?;
            Some((version, tag.raw))
        })
        .max_by(|(a, _), (b, _)| a.cmp_precedence(b).then_with(|| a.cmp(b)))
        .map(|(_, raw)| raw)
}

/// Common git operation trait for abstraction
///
/// All implementors must be `Send`. `git2` handles are not `Sync`, so a
/// repository is moved between threads rather than shared. Methods return
/// [crate::error::Result<T>], mapping underlying errors (like `git2::Error`)
/// to [crate::error::NsvError] variants.
pub trait Repository: Send {
    /// Latest tag matching `query`, ordered by semantic version
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The raw name of the highest matching tag
    /// * `Ok(None)` - If no tag matches
    fn latest_tag(&self, query: &TagQuery) -> Result<Option<String>>;

    /// History from HEAD back to (excluding) `since_tag`, newest first
    ///
    /// Only commits touching `path` are returned; an empty path means the
    /// whole repository. Without `since_tag` the full history is returned.
    ///
    /// # Arguments
    /// * `path` - Subtree relative to the repository root
    /// * `since_tag` - Tag marking the previous release
    fn log(&self, path: &str, since_tag: Option<&str>) -> Result<Vec<CommitRecord>>;

    /// Convert a path into one relative to the repository root, using `/`
    /// separators. The root itself is the empty string.
    fn relative_path(&self, path: &Path) -> Result<String>;

    /// Root of the working tree, if there is one
    fn workdir(&self) -> Option<PathBuf>;

    /// Whether the repository is a shallow clone
    fn is_shallow(&self) -> bool;

    /// Create an annotated tag
    fn create_tag(&self, tag: &NewTag<'_>) -> Result<()>;

    /// Paths with uncommitted changes, untracked files included, relative to
    /// the repository root
    fn changed_files(&self) -> Result<Vec<String>>;

    /// Stage `commit.paths` and commit them on HEAD, returning the new hash
    fn commit_files(&self, commit: &NewCommit<'_>) -> Result<String>;

    /// Discard working tree changes to `paths`; untracked files are removed
    fn restore_files(&self, paths: &[String]) -> Result<()>;
}
