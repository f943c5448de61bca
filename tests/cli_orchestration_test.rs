// tests/cli_orchestration_test.rs
use chrono::{TimeZone, Utc};
use git_tidy::cli::{
    run_branch_cleanup, run_tag_cleanup, BranchCleanupArgs, RunOutcome, TagCleanupArgs,
};
use git_tidy::domain::MergeMethod;
use git_tidy::git::MockRepository;
use git_tidy::hosting::{MergeStatusSource, NoHosting, StaticMergeStatus};
use git_tidy::warning::CleanupWarning;
use git_tidy::GitTidyError;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

struct Offline;

impl MergeStatusSource for Offline {
    fn merged_pr_exists(&self, _branch: &str) -> bool {
        false
    }

    fn unavailable_reason(&self) -> Option<String> {
        Some("gh is not authenticated".to_string())
    }
}

fn tag_args(apply: bool) -> TagCleanupArgs {
    TagCleanupArgs {
        remote: "origin".to_string(),
        keep: 1,
        months: 6,
        apply,
    }
}

fn branch_args(issues_file: PathBuf, apply: bool) -> BranchCleanupArgs {
    BranchCleanupArgs {
        remote: "origin".to_string(),
        branch: None,
        issues_file,
        protected: Vec::new(),
        apply,
    }
}

fn missing_issues() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("issues.csv");
    (dir, path)
}

fn tag_repo() -> MockRepository {
    let mut repo = MockRepository::new();
    repo.add_tag("0001", 0);
    repo.add_tag("0002", 0);
    repo.add_tag("0003", 0);
    repo
}

fn branch_repo() -> MockRepository {
    let mut repo = MockRepository::new();
    repo.set_default_branch("main");
    repo.add_remote_branch("main", true);
    repo.add_remote_branch("merged-a", true);
    repo.add_remote_branch("merged-b", true);
    repo.add_remote_branch("open-work", false);
    repo
}

#[test]
fn test_tag_dry_run_deletes_nothing() {
    let repo = tag_repo();
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    let (report, outcome) = run_tag_cleanup(&repo, &tag_args(false), now).unwrap();
    assert_eq!(report.to_delete, vec!["0001", "0002"]);
    assert_eq!(outcome, RunOutcome::DryRun { candidates: 2 });
    assert_eq!(outcome.exit_code(), 0);
    assert!(repo.deleted().is_empty());
    assert_eq!(repo.fetch_count(), 1);
}

#[test]
fn test_tag_apply_deletes_local_and_remote() {
    let repo = tag_repo();
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    let (_, outcome) = run_tag_cleanup(&repo, &tag_args(true), now).unwrap();
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(
        repo.deleted(),
        vec![
            "0001",
            "origin:refs/tags/0001",
            "0002",
            "origin:refs/tags/0002"
        ]
    );
}

#[test]
fn test_tag_apply_with_nothing_to_delete() {
    let mut repo = MockRepository::new();
    repo.add_tag("0001", 0);
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    let (_, outcome) = run_tag_cleanup(&repo, &tag_args(true), now).unwrap();
    assert_eq!(outcome, RunOutcome::NothingToDo);
    assert!(repo.deleted().is_empty());
}

#[test]
fn test_fetch_failure_is_reported_not_fatal() {
    let mut repo = tag_repo();
    repo.fail_fetch("authentication required");
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    let (report, _) = run_tag_cleanup(&repo, &tag_args(false), now).unwrap();
    assert!(matches!(
        report.warnings.first(),
        Some(CleanupWarning::FetchFailed { .. })
    ));
}

#[test]
fn test_branch_dry_run_reports_missing_issue_file() {
    let repo = branch_repo();
    let (_dir, issues) = missing_issues();

    let (report, outcome) =
        run_branch_cleanup(&repo, &NoHosting, &branch_args(issues, false)).unwrap();
    assert_eq!(outcome, RunOutcome::DryRun { candidates: 2 });
    assert!(!report.issue_layer_enabled);
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, CleanupWarning::IssuesFileMissing { .. })));
    assert!(repo.deleted().is_empty());
}

#[test]
fn test_branch_apply_continues_after_failure() {
    let mut repo = branch_repo();
    repo.fail_deletion_of("merged-a");
    let (_dir, issues) = missing_issues();

    let (_, outcome) = run_branch_cleanup(&repo, &NoHosting, &branch_args(issues, true)).unwrap();
    match &outcome {
        RunOutcome::Applied(summary) => {
            assert_eq!(summary.deleted, vec!["merged-b"]);
            assert_eq!(summary.failed.len(), 1);
        }
        other => panic!("expected apply outcome, got {:?}", other),
    }
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(repo.deleted(), vec!["origin/merged-b"]);
}

#[test]
fn test_unknown_default_branch_is_fatal() {
    let mut repo = MockRepository::new();
    repo.add_remote_branch("merged", true);
    let (_dir, issues) = missing_issues();

    let err = run_branch_cleanup(&repo, &NoHosting, &branch_args(issues, true)).unwrap_err();
    assert!(matches!(err, GitTidyError::DefaultBranch(_)));
    assert!(repo.deleted().is_empty());
}

#[test]
fn test_targeted_branch_must_exist() {
    let repo = branch_repo();
    let (_dir, issues) = missing_issues();
    let mut args = branch_args(issues, true);
    args.branch = Some("ghost".to_string());

    let err = run_branch_cleanup(&repo, &NoHosting, &args).unwrap_err();
    assert!(matches!(err, GitTidyError::BranchNotFound(_)));
    assert!(repo.deleted().is_empty());
}

#[test]
fn test_targeted_branch_scopes_run() {
    let repo = branch_repo();
    let (_dir, issues) = missing_issues();
    let mut args = branch_args(issues, true);
    args.branch = Some("origin/merged-b".to_string());

    let (report, _) = run_branch_cleanup(&repo, &NoHosting, &args).unwrap();
    assert_eq!(report.total(), 1);
    assert_eq!(repo.deleted(), vec!["origin/merged-b"]);
}

#[test]
fn test_issue_file_guards_deletion() {
    let mut repo = branch_repo();
    repo.add_remote_branch("12345-fix-login", false);
    let hosting = StaticMergeStatus::new(["12345-fix-login"]);

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,title,status").unwrap();
    writeln!(file, "12345,Fix login,In Progress").unwrap();
    file.flush().unwrap();

    let args = branch_args(file.path().to_path_buf(), true);
    let (report, _) = run_branch_cleanup(&repo, &hosting, &args).unwrap();

    assert!(report.issue_layer_enabled);
    assert_eq!(report.saved_by_issue.len(), 1);
    assert_eq!(report.count_by_method(MergeMethod::Git), 2);
    assert!(!repo.deleted().contains(&"origin/12345-fix-login".to_string()));
}

#[test]
fn test_unavailable_hosting_is_reported() {
    let repo = branch_repo();
    let (_dir, issues) = missing_issues();

    let (report, _) = run_branch_cleanup(&repo, &Offline, &branch_args(issues, false)).unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, CleanupWarning::HostingUnavailable { .. })));
}
