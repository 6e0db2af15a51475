use crate::domain::CommitRecord;
use crate::error::{NsvError, Result};
use crate::git::{select_latest_tag, NewCommit, NewTag, TagQuery};
use git2::build::CheckoutBuilder;
use git2::{
    DiffOptions, IndexAddOption, Oid, Repository as Git2Repo, Signature, Sort, StatusOptions,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn tag_target(&self, tag_name: &str) -> Result<Oid> {
        let reference_name = format!("refs/tags/{}", tag_name);

        let reference = self
            .repo
            .find_reference(&reference_name)
            .map_err(|e| NsvError::tag(format!("Cannot find tag '{}': {}", tag_name, e)))?;

        let commit = reference
            .peel_to_commit()
            .map_err(|e| NsvError::tag(format!("Cannot peel tag '{}': {}", tag_name, e)))?;

        Ok(commit.id())
    }

    fn find_commit(&self, hash: &str) -> Result<git2::Commit<'_>> {
        let oid = Oid::from_str(hash)?;
        self.repo
            .find_commit(oid)
            .map_err(|e| NsvError::tag(format!("Cannot find commit {}: {}", hash, e)))
    }

    /// Configured git identity, falling back to the committer of
    /// `impersonate` when none is set
    fn signature(&self, impersonate: &str) -> Result<Signature<'static>> {
        if let Ok(signature) = self.repo.signature() {
            return Ok(signature);
        }

        let signer = self.find_commit(impersonate)?;
        let committer = signer.committer().to_owned();
        info!(
            name = committer.name().unwrap_or_default(),
            email = committer.email().unwrap_or_default(),
            "no git identity configured, impersonating committer"
        );
        Ok(committer)
    }

    fn workdir_path(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| NsvError::tag("repository has no working directory"))
    }

    /// Whether a commit changes anything under `path` relative to its first
    /// parent
    fn touches_path(&self, commit: &git2::Commit<'_>, path: &str) -> Result<bool> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let mut opts = DiffOptions::new();
        opts.pathspec(path);

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        Ok(diff.deltas().next().is_some())
    }
}

impl super::Repository for Git2Repository {
    #[instrument(skip(self))]
    fn latest_tag(&self, query: &TagQuery) -> Result<Option<String>> {
        let tags = self.repo.tag_names(None)?;
        let latest = select_latest_tag(tags.iter().flatten(), query);

        debug!(?latest, "resolved latest tag");
        Ok(latest)
    }

    #[instrument(skip(self))]
    fn log(&self, path: &str, since_tag: Option<&str>) -> Result<Vec<CommitRecord>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        if let Some(tag) = since_tag {
            revwalk.hide(self.tag_target(tag)?)?;
        }

        let mut commits = Vec::new();

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            if !path.is_empty() && !self.touches_path(&commit, path)? {
                continue;
            }

            let message = String::from_utf8_lossy(commit.message_bytes());
            commits.push(CommitRecord::new(oid.to_string(), message));
        }

        debug!(count = commits.len(), "scanned history");
        Ok(commits)
    }

    fn relative_path(&self, path: &Path) -> Result<String> {
        let workdir = self.workdir_path()?.canonicalize()?;
        let path = path.canonicalize()?;

        let relative = path.strip_prefix(&workdir).map_err(|_| {
            NsvError::tag(format!(
                "'{}' is not inside the repository at '{}'",
                path.display(),
                workdir.display()
            ))
        })?;

        Ok(relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"))
    }

    fn workdir(&self) -> Option<PathBuf> {
        self.repo.workdir().map(Path::to_path_buf)
    }

    fn is_shallow(&self) -> bool {
        self.repo.is_shallow()
    }

    #[instrument(skip(self, tag), fields(name = tag.name, target = tag.target))]
    fn create_tag(&self, tag: &NewTag<'_>) -> Result<()> {
        let commit = self.find_commit(tag.target)?;
        let tagger = self.signature(tag.impersonate)?;

        self.repo
            .tag(tag.name, commit.as_object(), &tagger, tag.message, false)
            .map_err(|e| NsvError::tag(format!("Cannot create tag '{}': {}", tag.name, e)))?;

        Ok(())
    }

    fn changed_files(&self) -> Result<Vec<String>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .filter(|entry| !entry.status().is_ignored())
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect())
    }

    #[instrument(skip(self, commit), fields(files = commit.paths.len()))]
    fn commit_files(&self, commit: &NewCommit<'_>) -> Result<String> {
        let signature = self.signature(commit.impersonate)?;

        let mut index = self.repo.index()?;
        let paths = commit.paths.iter().map(String::as_str);
        index.add_all(paths.clone(), IndexAddOption::DEFAULT, None)?;
        index.update_all(paths, None)?;
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = self.repo.head()?.peel_to_commit()?;
        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            commit.message,
            &tree,
            &[&parent],
        )?;

        debug!(hash = %oid, "committed files");
        Ok(oid.to_string())
    }

    #[instrument(skip(self))]
    fn restore_files(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let workdir = self.workdir_path()?.to_path_buf();
        let head = self.repo.head()?.peel_to_tree()?;
        let mut index = self.repo.index()?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        let mut tracked = false;

        for path in paths {
            if head.get_path(Path::new(path)).is_ok() {
                checkout.path(path.as_str());
                tracked = true;
                continue;
            }

            index.remove_path(Path::new(path))?;
            let full = workdir.join(path);
            if full.is_file() {
                fs::remove_file(&full)?;
            }
        }
        index.write()?;

        if tracked {
            self.repo.checkout_head(Some(&mut checkout))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use git2::Signature;
    use std::fs;
    use tempfile::TempDir;

    fn commit(repo: &Git2Repo, file: &str, message: &str) -> Oid {
        let root = repo.workdir().unwrap().to_path_buf();
        let full = root.join(file);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, message).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn test_log_stops_at_tag() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();

        let tagged = commit(&repo, "a.txt", "feat: first");
        repo.tag_lightweight("0.1.0", &repo.find_object(tagged, None).unwrap(), false)
            .unwrap();
        commit(&repo, "b.txt", "fix: second");
        commit(&repo, "c.txt", "docs: third");

        let wrapped = Git2Repository::from_git2(repo);
        let log = wrapped.log("", Some("0.1.0")).unwrap();

        let messages: Vec<&str> = log.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["docs: third", "fix: second"]);
    }

    #[test]
    fn test_log_scoped_to_path() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();

        commit(&repo, "README.md", "docs: readme");
        commit(&repo, "search/main.go", "feat(search): index");
        commit(&repo, "store/main.go", "fix(store): bug");

        let wrapped = Git2Repository::from_git2(repo);
        let log = wrapped.log("search", None).unwrap();

        assert_eq!(log.len(), 1);
        assert_eq!(log[0].message, "feat(search): index");
    }

    #[test]
    fn test_unknown_since_tag_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        commit(&repo, "a.txt", "feat: first");

        let wrapped = Git2Repository::from_git2(repo);
        assert!(wrapped.log("", Some("9.9.9")).is_err());
    }

    #[test]
    fn test_relative_path() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        fs::create_dir_all(dir.path().join("services/search")).unwrap();

        let wrapped = Git2Repository::from_git2(repo);
        assert_eq!(wrapped.relative_path(dir.path()).unwrap(), "");
        assert_eq!(
            wrapped
                .relative_path(&dir.path().join("services/search"))
                .unwrap(),
            "services/search"
        );
    }

    #[test]
    fn test_create_annotated_tag() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        let oid = commit(&repo, "a.txt", "feat: first");

        let wrapped = Git2Repository::from_git2(repo);
        let hash = oid.to_string();
        wrapped
            .create_tag(&NewTag {
                name: "0.1.0",
                target: &hash,
                impersonate: &hash,
                message: "chore: tagged release 0.1.0",
            })
            .unwrap();

        assert_eq!(
            wrapped.latest_tag(&TagQuery::new("")).unwrap(),
            Some("0.1.0".to_string())
        );
        assert_eq!(wrapped.tag_target("0.1.0").unwrap(), oid);
    }

    #[test]
    fn test_changed_files_include_untracked() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        commit(&repo, "a.txt", "feat: first");
        fs::write(dir.path().join("a.txt"), "edited").unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/new.md"), "new").unwrap();

        let wrapped = Git2Repository::from_git2(repo);
        let mut changed = wrapped.changed_files().unwrap();
        changed.sort();
        assert_eq!(changed, vec!["a.txt", "docs/new.md"]);
    }

    #[test]
    fn test_commit_files_on_head() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        let first = commit(&repo, "a.txt", "feat: first");
        fs::write(dir.path().join("a.txt"), "edited").unwrap();
        fs::write(dir.path().join("b.txt"), "added").unwrap();

        let wrapped = Git2Repository::from_git2(repo);
        let first = first.to_string();
        let paths = vec!["a.txt".to_string(), "b.txt".to_string()];
        let hash = wrapped
            .commit_files(&NewCommit {
                paths: &paths,
                impersonate: &first,
                message: "chore: patched files",
            })
            .unwrap();

        assert!(wrapped.changed_files().unwrap().is_empty());
        let log = wrapped.log("", None).unwrap();
        assert_eq!(log[0].hash, hash);
        assert_eq!(log[0].message, "chore: patched files");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_restore_files() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        commit(&repo, "a.txt", "feat: first");
        fs::write(dir.path().join("a.txt"), "edited").unwrap();
        fs::write(dir.path().join("b.txt"), "added").unwrap();

        let wrapped = Git2Repository::from_git2(repo);
        wrapped
            .restore_files(&["a.txt".to_string(), "b.txt".to_string()])
            .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "feat: first"
        );
        assert!(!dir.path().join("b.txt").exists());
        assert!(wrapped.changed_files().unwrap().is_empty());
    }

    #[test]
    fn test_repository_can_move_between_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<Git2Repository>();
    }

    #[test]
    fn test_fresh_repository_is_not_shallow() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        assert!(!Git2Repository::from_git2(repo).is_shallow());
    }
}
