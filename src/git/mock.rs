use crate::domain::CommitRecord;
use crate::error::{NsvError, Result};
use crate::git::{select_latest_tag, NewCommit, NewTag, Repository, TagQuery};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct MockCommit {
    record: CommitRecord,
    paths: Vec<String>,
}

/// Annotated tag recorded by [MockRepository::create_tag]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub name: String,
    pub target: String,
    pub impersonate: String,
    pub message: String,
}

/// Commit recorded by [MockRepository::commit_files]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCommit {
    pub hash: String,
    pub paths: Vec<String>,
    pub impersonate: String,
    pub message: String,
}

/// Mock repository for testing without actual git operations
///
/// Commits are added oldest first and tags always point at the newest commit
/// at the time they are added.
pub struct MockRepository {
    root: PathBuf,
    shallow: bool,
    commits: Vec<MockCommit>,
    tags: Vec<(String, usize)>,
    created: Mutex<Vec<CreatedTag>>,
    changed: Mutex<Vec<String>>,
    committed: Mutex<Vec<CreatedCommit>>,
    restored: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository rooted at `/repo`
    pub fn new() -> Self {
        Self::with_root("/repo")
    }

    /// Create a new empty mock repository rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        MockRepository {
            root: root.into(),
            shallow: false,
            commits: Vec::new(),
            tags: Vec::new(),
            created: Mutex::new(Vec::new()),
            changed: Mutex::new(Vec::new()),
            committed: Mutex::new(Vec::new()),
            restored: Mutex::new(Vec::new()),
        }
    }

    /// Add a commit touching `paths`, returning its hash
    pub fn add_commit(&mut self, message: &str, paths: &[&str]) -> String {
        let hash = format!("{:040x}", self.commits.len() + 1);
        self.commits.push(MockCommit {
            record: CommitRecord::new(hash.clone(), message),
            paths: paths.iter().map(|p| p.to_string()).collect(),
        });
        hash
    }

    /// Tag the newest commit
    pub fn add_tag(&mut self, name: impl Into<String>) {
        let head = self.commits.len().saturating_sub(1);
        self.tags.push((name.into(), head));
    }

    pub fn set_shallow(&mut self, shallow: bool) {
        self.shallow = shallow;
    }

    /// Tags created through the [Repository] interface
    pub fn created_tags(&self) -> Vec<CreatedTag> {
        lock(&self.created).clone()
    }

    /// Mark paths as changed in the working tree
    pub fn set_changed_files(&self, paths: &[&str]) {
        *lock(&self.changed) = paths.iter().map(|p| p.to_string()).collect();
    }

    /// Commits created through the [Repository] interface
    pub fn created_commits(&self) -> Vec<CreatedCommit> {
        lock(&self.committed).clone()
    }

    /// Paths discarded through the [Repository] interface
    pub fn restored_files(&self) -> Vec<String> {
        lock(&self.restored).clone()
    }

    fn tag_index(&self, name: &str) -> Option<usize> {
        self.tags
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, index)| *index)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn touches(paths: &[String], path: &str) -> bool {
    path.is_empty()
        || paths
            .iter()
            .any(|p| p == path || p.starts_with(&format!("{}/", path)))
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn latest_tag(&self, query: &TagQuery) -> Result<Option<String>> {
        let mut names: Vec<String> = self.tags.iter().map(|(name, _)| name.clone()).collect();
        names.extend(self.created_tags().into_iter().map(|t| t.name));
        Ok(select_latest_tag(names, query))
    }

    fn log(&self, path: &str, since_tag: Option<&str>) -> Result<Vec<CommitRecord>> {
        let stop = match since_tag {
            Some(tag) => Some(
                self.tag_index(tag)
                    .ok_or_else(|| NsvError::tag(format!("Cannot find tag '{}'", tag)))?,
            ),
            None => None,
        };

        Ok(self
            .commits
            .iter()
            .enumerate()
            .rev()
            .take_while(|(i, _)| stop.map_or(true, |s| *i > s))
            .filter(|(_, c)| touches(&c.paths, path))
            .map(|(_, c)| c.record.clone())
            .collect())
    }

    fn relative_path(&self, path: &Path) -> Result<String> {
        let relative = path.strip_prefix(&self.root).map_err(|_| {
            NsvError::tag(format!("'{}' is not inside the repository", path.display()))
        })?;

        Ok(relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"))
    }

    fn workdir(&self) -> Option<PathBuf> {
        Some(self.root.clone())
    }

    fn is_shallow(&self) -> bool {
        self.shallow
    }

    fn create_tag(&self, tag: &NewTag<'_>) -> Result<()> {
        let mut created = lock(&self.created);
        if self.tag_index(tag.name).is_some() || created.iter().any(|t| t.name == tag.name) {
            return Err(NsvError::tag(format!("Tag '{}' already exists", tag.name)));
        }

        created.push(CreatedTag {
            name: tag.name.to_string(),
            target: tag.target.to_string(),
            impersonate: tag.impersonate.to_string(),
            message: tag.message.to_string(),
        });
        Ok(())
    }

    fn changed_files(&self) -> Result<Vec<String>> {
        Ok(lock(&self.changed).clone())
    }

    fn commit_files(&self, commit: &NewCommit<'_>) -> Result<String> {
        let mut committed = lock(&self.committed);
        let hash = format!("{:040x}", self.commits.len() + committed.len() + 1);

        lock(&self.changed).retain(|path| !commit.paths.contains(path));
        committed.push(CreatedCommit {
            hash: hash.clone(),
            paths: commit.paths.to_vec(),
            impersonate: commit.impersonate.to_string(),
            message: commit.message.to_string(),
        });
        Ok(hash)
    }

    fn restore_files(&self, paths: &[String]) -> Result<()> {
        lock(&self.changed).retain(|path| !paths.contains(path));
        lock(&self.restored).extend(paths.iter().cloned());
        Ok(())
    }
}
