use crate::error::{GitTidyError, Result};
use crate::git::{tag_ref, RefSource};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Mock repository for testing without actual git operations.
///
/// Ancestry is scripted per branch: a branch added with `merged = true` is
/// reported as an ancestor of anything. Deletions are recorded so tests can
/// assert on the side effects of apply mode.
pub struct MockRepository {
    tags: Vec<String>,
    timestamps: HashMap<String, i64>,
    remote_branches: Vec<String>,
    ancestors: HashSet<String>,
    broken_ancestry: HashSet<String>,
    default_branch: Option<String>,
    failing_deletions: HashSet<String>,
    fetch_error: Option<String>,
    deleted: RefCell<Vec<String>>,
    fetches: RefCell<usize>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            tags: Vec::new(),
            timestamps: HashMap::new(),
            remote_branches: Vec::new(),
            ancestors: HashSet::new(),
            broken_ancestry: HashSet::new(),
            default_branch: None,
            failing_deletions: HashSet::new(),
            fetch_error: None,
            deleted: RefCell::new(Vec::new()),
            fetches: RefCell::new(0),
        }
    }

    /// Add a tag whose target commit has the given time
    pub fn add_tag(&mut self, name: impl Into<String>, commit_time: i64) {
        let name = name.into();
        self.timestamps.insert(tag_ref(&name), commit_time);
        self.tags.push(name);
    }

    /// Add a tag whose target commit cannot be resolved
    pub fn add_dangling_tag(&mut self, name: impl Into<String>) {
        self.tags.push(name.into());
    }

    /// Add a remote branch; `merged` controls the ancestor test
    pub fn add_remote_branch(&mut self, name: impl Into<String>, merged: bool) {
        let name = name.into();
        if merged {
            self.ancestors.insert(name.clone());
        }
        self.remote_branches.push(name);
    }

    /// Make the ancestor test for `name` return an error
    pub fn break_ancestry(&mut self, name: impl Into<String>) {
        self.broken_ancestry.insert(name.into());
    }

    /// Set the default branch reported for every remote
    pub fn set_default_branch(&mut self, name: impl Into<String>) {
        self.default_branch = Some(name.into());
    }

    /// Make deletion of the branch or tag `name` fail
    pub fn fail_deletion_of(&mut self, name: impl Into<String>) {
        self.failing_deletions.insert(name.into());
    }

    /// Make `fetch_and_prune` fail with the given reason
    pub fn fail_fetch(&mut self, reason: impl Into<String>) {
        self.fetch_error = Some(reason.into());
    }

    /// Names deleted so far, in order. Remote deletions are prefixed with the remote.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.borrow().clone()
    }

    /// Number of `fetch_and_prune` calls made
    pub fn fetch_count(&self) -> usize {
        *self.fetches.borrow()
    }

    fn record_deletion(&self, name: &str, entry: String) -> Result<()> {
        if self.failing_deletions.contains(name) {
            return Err(GitTidyError::remote(format!("cannot delete '{}'", name)));
        }
        self.deleted.borrow_mut().push(entry);
        Ok(())
    }

    /// Branch name of a `refs/remotes/<remote>/<branch>` ref.
    fn short_branch<'a>(&self, refname: &'a str) -> &'a str {
        let tracking = refname.strip_prefix("refs/remotes/").unwrap_or(refname);
        tracking
            .split_once('/')
            .map(|(_, b)| b)
            .unwrap_or(tracking)
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RefSource for MockRepository {
    fn fetch_and_prune(&self, _remote: &str) -> Result<()> {
        *self.fetches.borrow_mut() += 1;
        match &self.fetch_error {
            Some(reason) => Err(GitTidyError::remote(reason.clone())),
            None => Ok(()),
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }

    fn list_remote_branches(&self, _remote: &str) -> Result<Vec<String>> {
        Ok(self.remote_branches.clone())
    }

    fn resolve_default_branch(&self, remote: &str) -> Result<String> {
        self.default_branch.clone().ok_or_else(|| {
            GitTidyError::default_branch(format!("no HEAD recorded for '{}'", remote))
        })
    }

    fn commit_timestamp(&self, refname: &str) -> Result<i64> {
        self.timestamps
            .get(refname)
            .copied()
            .ok_or_else(|| GitTidyError::Git(git2::Error::from_str("object not found")))
    }

    fn is_ancestor(&self, ancestor: &str, _descendant: &str) -> Result<bool> {
        let branch = self.short_branch(ancestor);
        if self.broken_ancestry.contains(branch) {
            return Err(GitTidyError::Git(git2::Error::from_str("corrupt object")));
        }
        Ok(self.ancestors.contains(branch))
    }

    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()> {
        self.record_deletion(name, format!("{}/{}", remote, name))
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.record_deletion(name, name.to_string())
    }

    fn delete_remote_tag_ref(&self, remote: &str, name: &str) -> Result<()> {
        self.record_deletion(name, format!("{}:refs/tags/{}", remote, name))
    }
}
