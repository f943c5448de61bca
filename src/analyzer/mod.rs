//! Classification engines for tags and remote branches

pub mod branch_merge;
pub mod tag_retention;

pub use branch_merge::{BranchMergeEngine, BranchReport};
pub use tag_retention::{RetentionPolicy, TagReport, TagRetentionEngine};
