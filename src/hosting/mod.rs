//! Merged pull request lookups against the code-hosting service
//!
//! The branch engine only asks one question of the hosting service: does a
//! merged pull request exist for this branch? Lookups never fail; an
//! unavailable or unauthenticated client simply answers `false`.

pub mod gh;

pub use gh::GhCli;

use std::collections::HashSet;

/// Source of merged pull request information.
pub trait MergeStatusSource {
    /// Whether at least one pull request for `branch` is in the `MERGED` state.
    fn merged_pr_exists(&self, branch: &str) -> bool;

    /// Why lookups are switched off, if they are.
    fn unavailable_reason(&self) -> Option<String> {
        None
    }
}

/// Hosting lookups switched off; every branch reports no merged pull request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHosting;

impl MergeStatusSource for NoHosting {
    fn merged_pr_exists(&self, _branch: &str) -> bool {
        false
    }
}

/// Fixed set of branches with merged pull requests, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct StaticMergeStatus {
    merged: HashSet<String>,
}

impl StaticMergeStatus {
    pub fn new<I, S>(branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticMergeStatus {
            merged: branches.into_iter().map(Into::into).collect(),
        }
    }
}

impl MergeStatusSource for StaticMergeStatus {
    fn merged_pr_exists(&self, branch: &str) -> bool {
        self.merged.contains(branch)
    }
}
