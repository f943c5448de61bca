//! Domain logic - pure classification rules independent of git operations

pub mod age;
pub mod branch;
pub mod outcome;
pub mod tag;

pub use age::{is_older_than, months_ago};
pub use branch::{task_id, ProtectedBranches, RESERVED_BRANCH};
pub use outcome::{BranchOutcome, IssueStatus, MergeMethod, TagOutcome};
pub use tag::{partition_release_tags, ReleaseTag};
