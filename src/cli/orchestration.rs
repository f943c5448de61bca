//! Cleanup workflows
//!
//! Each workflow follows the same steps: fetch and prune, enumerate, classify,
//! report, and (only with `apply`) delete. The argument structs mirror the CLI
//! flags but do not depend on clap, so workflows can be driven from tests.

use chrono::{DateTime, Utc};
use log::info;
use std::path::PathBuf;

use crate::analyzer::{
    BranchMergeEngine, BranchReport, RetentionPolicy, TagReport, TagRetentionEngine,
};
use crate::error::{GitTidyError, Result};
use crate::execute::{self, DeletionSummary};
use crate::git::RefSource;
use crate::hosting::MergeStatusSource;
use crate::issues::IssueIndex;
use crate::ui;
use crate::warning::CleanupWarning;

/// Arguments for the tag cleanup workflow
#[derive(Debug, Clone, PartialEq)]
pub struct TagCleanupArgs {
    pub remote: String,
    pub keep: usize,
    pub months: u32,
    pub apply: bool,
}

/// Arguments for the branch cleanup workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BranchCleanupArgs {
    pub remote: String,
    /// Restrict the run to this branch
    pub branch: Option<String>,
    /// Issue export; a missing file disables the issue-safety layer
    pub issues_file: PathBuf,
    /// Extra names that are never deleted
    pub protected: Vec<String>,
    pub apply: bool,
}

/// How a workflow finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No deletion candidates
    NothingToDo,
    /// Candidates found but not deleted
    DryRun { candidates: usize },
    /// Deletions were attempted
    Applied(DeletionSummary),
}

impl RunOutcome {
    /// Process exit code: non-zero only when an apply-mode deletion failed.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Applied(summary) if summary.has_failures() => 1,
            _ => 0,
        }
    }
}

/// Fetch and prune, turning a failure into a warning.
fn refresh<R: RefSource>(repo: &R, remote: &str) -> Option<CleanupWarning> {
    ui::display_status(&format!("Fetching and pruning '{}'...", remote));
    match repo.fetch_and_prune(remote) {
        Ok(()) => None,
        Err(e) => Some(CleanupWarning::FetchFailed {
            remote: remote.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Run the tag retention workflow as of `now`.
pub fn run_tag_cleanup<R: RefSource>(
    repo: &R,
    args: &TagCleanupArgs,
    now: DateTime<Utc>,
) -> Result<(TagReport, RunOutcome)> {
    let mut warnings: Vec<CleanupWarning> = refresh(repo, &args.remote).into_iter().collect();

    let tags = repo.list_tags()?;
    info!("found {} tags", tags.len());

    let engine = TagRetentionEngine::new(RetentionPolicy {
        keep: args.keep,
        months: args.months,
    });
    let mut report = engine.classify(repo, &tags, now);
    warnings.append(&mut report.warnings);
    report.warnings = warnings;

    ui::display_tag_report(&report);

    if report.to_delete.is_empty() {
        ui::display_success("No tags to delete");
        return Ok((report, RunOutcome::NothingToDo));
    }

    if !args.apply {
        ui::display_dry_run_hint();
        let candidates = report.to_delete.len();
        return Ok((report, RunOutcome::DryRun { candidates }));
    }

    ui::display_status(&format!("Deleting {} tags...", report.to_delete.len()));
    let summary = execute::delete_tags(repo, &args.remote, &report.to_delete);
    ui::display_deletion_summary("tags", &summary);
    Ok((report, RunOutcome::Applied(summary)))
}

/// Run the merged-branch workflow.
///
/// Fails without deleting anything if the default branch cannot be resolved
/// or the requested `--branch` does not exist on the remote.
pub fn run_branch_cleanup<R: RefSource, H: MergeStatusSource>(
    repo: &R,
    hosting: &H,
    args: &BranchCleanupArgs,
) -> Result<(BranchReport, RunOutcome)> {
    let mut warnings: Vec<CleanupWarning> = refresh(repo, &args.remote).into_iter().collect();

    let default_branch = repo.resolve_default_branch(&args.remote)?;
    info!("default branch of '{}' is '{}'", args.remote, default_branch);

    let remote_branches = repo.list_remote_branches(&args.remote)?;
    let branches = match &args.branch {
        Some(target) => vec![select_target(&remote_branches, &args.remote, target)?],
        None => remote_branches,
    };

    if let Some(reason) = hosting.unavailable_reason() {
        warnings.push(CleanupWarning::HostingUnavailable { reason });
    }

    let issues = IssueIndex::load(&args.issues_file)?;
    match &issues {
        Some(index) => {
            info!(
                "loaded {} tasks from {}",
                index.len(),
                args.issues_file.display()
            );
            warnings.extend(index.duplicate_warnings());
        }
        None => warnings.push(CleanupWarning::IssuesFileMissing {
            path: args.issues_file.display().to_string(),
        }),
    }

    let mut engine = BranchMergeEngine::new(repo, hosting, args.remote.as_str(), default_branch)
        .with_protected(&args.protected);
    if let Some(index) = &issues {
        engine = engine.with_issues(index);
    }

    let mut report = engine.classify(&branches);
    warnings.append(&mut report.warnings);
    report.warnings = warnings;

    ui::display_branch_report(&report);

    if report.to_delete.is_empty() {
        ui::display_success("No branches to delete");
        return Ok((report, RunOutcome::NothingToDo));
    }

    if !args.apply {
        ui::display_dry_run_hint();
        let candidates = report.to_delete.len();
        return Ok((report, RunOutcome::DryRun { candidates }));
    }

    let names: Vec<&str> = report
        .to_delete
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    ui::display_status(&format!("Deleting {} branches...", names.len()));
    let summary = execute::delete_branches(repo, &args.remote, &names);
    ui::display_deletion_summary("branches", &summary);
    Ok((report, RunOutcome::Applied(summary)))
}

/// Resolve a `--branch` argument against the remote branch list.
/// A leading `<remote>/` is accepted and stripped.
fn select_target(remote_branches: &[String], remote: &str, target: &str) -> Result<String> {
    let prefix = format!("{}/", remote);
    let name = target.strip_prefix(&prefix).unwrap_or(target);

    if remote_branches.iter().any(|b| b == name) {
        Ok(name.to_string())
    } else {
        Err(GitTidyError::branch_not_found(format!("{}/{}", remote, name)))
    }
}
