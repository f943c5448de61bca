//! Workflow orchestration, decoupled from argument parsing

pub mod orchestration;

pub use orchestration::{
    run_branch_cleanup, run_tag_cleanup, BranchCleanupArgs, RunOutcome, TagCleanupArgs,
};
