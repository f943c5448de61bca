//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the ref operations the
//! cleanup engines need, allowing for a real `git2`-backed implementation and
//! an in-memory mock for testing.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Engines depend on the [RefSource] trait only, so they can be exercised
//! without a repository on disk.
//!
//! ```rust
//! # use git_tidy::git::RefSource;
//! # fn example<R: RefSource>(repo: &R) -> git_tidy::Result<()> {
//! let default_branch = repo.resolve_default_branch("origin")?;
//! let merged = repo.is_ancestor(
//!     "refs/remotes/origin/feature",
//!     &format!("refs/remotes/origin/{}", default_branch),
//! )?;
//! # let _ = merged;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Fully qualified ref name for a tag, so lookups never collide with a branch
/// of the same name.
pub fn tag_ref(tag_name: &str) -> String {
    format!("refs/tags/{}", tag_name)
}

/// Fully qualified remote-tracking ref for a branch (e.g.
/// `refs/remotes/origin/main`), so a local branch named `origin/main` is
/// never picked up instead.
pub fn remote_branch_ref(remote: &str, branch: &str) -> String {
    format!("refs/remotes/{}/{}", remote, branch)
}

/// Read and delete operations on tags and remote branches.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Callers decide which failures
/// are fatal: default-branch resolution is, a single timestamp or ancestry
/// lookup is not.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation with scripted answers
pub trait RefSource {
    /// Fetch from the remote and prune remote-tracking refs that no longer exist there.
    fn fetch_and_prune(&self, remote: &str) -> Result<()>;

    /// List all tag names. Order is not meaningful.
    fn list_tags(&self) -> Result<Vec<String>>;

    /// List remote-tracking branch names for `remote`, without the remote prefix
    /// and without symbolic aliases such as `HEAD`.
    fn list_remote_branches(&self, remote: &str) -> Result<Vec<String>>;

    /// Resolve the default branch name of `remote` (e.g. `main`).
    ///
    /// # Returns
    /// * `Ok(String)` - Branch name without the remote prefix
    /// * `Err` - If the default branch cannot be determined
    fn resolve_default_branch(&self, remote: &str) -> Result<String>;

    /// Commit time, in seconds since the epoch, of the commit `refname` points to.
    ///
    /// Annotated tags are dereferenced to their target commit; the tag's own
    /// creation time is never used.
    fn commit_timestamp(&self, refname: &str) -> Result<i64>;

    /// Whether the tip of `ancestor` is reachable from the tip of `descendant`.
    /// A commit counts as its own ancestor.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool>;

    /// Delete branch `name` on `remote`.
    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()>;

    /// Delete the local tag `name`.
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Delete tag `name` on `remote`.
    fn delete_remote_tag_ref(&self, remote: &str, name: &str) -> Result<()>;
}
