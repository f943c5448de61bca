use crate::domain::{BranchOutcome, IssueStatus, MergeMethod, ProtectedBranches};
use crate::git::{remote_branch_ref, RefSource};
use crate::hosting::MergeStatusSource;
use crate::issues::IssueIndex;
use crate::warning::CleanupWarning;
use log::debug;

/// Result of classifying remote branches.
///
/// Each branch appears in exactly one bucket, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchReport {
    pub default_branch: String,
    pub issue_layer_enabled: bool,
    pub protected: Vec<String>,
    pub to_delete: Vec<(String, MergeMethod)>,
    pub saved_by_issue: Vec<(String, IssueStatus)>,
    pub skipped_not_merged: Vec<String>,
    pub closed_issue_unmerged: Vec<String>,
    pub warnings: Vec<CleanupWarning>,
}

impl BranchReport {
    /// Number of branches to delete that were found merged by `method`.
    pub fn count_by_method(&self, method: MergeMethod) -> usize {
        self.to_delete.iter().filter(|(_, m)| *m == method).count()
    }

    pub fn total(&self) -> usize {
        self.protected.len()
            + self.to_delete.len()
            + self.saved_by_issue.len()
            + self.skipped_not_merged.len()
            + self.closed_issue_unmerged.len()
    }

    fn record(&mut self, branch: &str, outcome: BranchOutcome) {
        let name = branch.to_string();
        match outcome {
            BranchOutcome::Protected => self.protected.push(name),
            BranchOutcome::Delete(method) => self.to_delete.push((name, method)),
            BranchOutcome::SavedByIssue(status) => self.saved_by_issue.push((name, status)),
            BranchOutcome::NotMerged => self.skipped_not_merged.push(name),
            BranchOutcome::ClosedIssueUnmerged => self.closed_issue_unmerged.push(name),
        }
    }
}

/// Decides which remote branches are merged and safe to delete.
///
/// Merge detection tries the local ancestor test first and only then asks the
/// hosting service, which catches squash and rebase merges.
pub struct BranchMergeEngine<'a, R: RefSource, H: MergeStatusSource> {
    repo: &'a R,
    hosting: &'a H,
    issues: Option<&'a IssueIndex>,
    remote: String,
    default_branch: String,
    protected: ProtectedBranches,
}

impl<'a, R: RefSource, H: MergeStatusSource> BranchMergeEngine<'a, R, H> {
    pub fn new(
        repo: &'a R,
        hosting: &'a H,
        remote: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Self {
        let default_branch = default_branch.into();
        BranchMergeEngine {
            repo,
            hosting,
            issues: None,
            remote: remote.into(),
            protected: ProtectedBranches::new(default_branch.clone(), &[]),
            default_branch,
        }
    }

    /// Enable the issue-safety layer.
    pub fn with_issues(mut self, issues: &'a IssueIndex) -> Self {
        self.issues = Some(issues);
        self
    }

    /// Protect extra branch names in addition to the default and reserved ones.
    pub fn with_protected(mut self, extra: &[String]) -> Self {
        self.protected = ProtectedBranches::new(self.default_branch.clone(), extra);
        self
    }

    /// Classify every branch in `branches`.
    pub fn classify<S: AsRef<str>>(&self, branches: &[S]) -> BranchReport {
        let mut report = BranchReport {
            default_branch: self.default_branch.clone(),
            issue_layer_enabled: self.issues.is_some(),
            ..BranchReport::default()
        };

        for branch in branches {
            let branch = branch.as_ref();
            let outcome = self.classify_one(branch, &mut report.warnings);
            debug!("branch {}: {:?}", branch, outcome);
            report.record(branch, outcome);
        }

        report
    }

    /// Classify a single branch, appending any fail-soft diagnostics to `warnings`.
    pub fn classify_one(&self, branch: &str, warnings: &mut Vec<CleanupWarning>) -> BranchOutcome {
        if self.protected.contains(branch) {
            return BranchOutcome::Protected;
        }

        match self.detect_merge(branch, warnings) {
            Some(method) => match self.issue_status(branch) {
                Some(status) if status.blocks_deletion() => BranchOutcome::SavedByIssue(status),
                _ => BranchOutcome::Delete(method),
            },
            None => match self.issue_status(branch) {
                Some(status) if status.is_closed() => BranchOutcome::ClosedIssueUnmerged,
                _ => BranchOutcome::NotMerged,
            },
        }
    }

    fn detect_merge(
        &self,
        branch: &str,
        warnings: &mut Vec<CleanupWarning>,
    ) -> Option<MergeMethod> {
        let branch_ref = remote_branch_ref(&self.remote, branch);
        let default_ref = remote_branch_ref(&self.remote, &self.default_branch);

        match self.repo.is_ancestor(&branch_ref, &default_ref) {
            Ok(true) => return Some(MergeMethod::Git),
            Ok(false) => {}
            Err(e) => warnings.push(CleanupWarning::AncestorCheckFailed {
                branch: branch.to_string(),
                reason: e.to_string(),
            }),
        }

        if self.hosting.merged_pr_exists(branch) {
            return Some(MergeMethod::PullRequest);
        }

        None
    }

    fn issue_status(&self, branch: &str) -> Option<IssueStatus> {
        self.issues.map(|index| index.status_for_branch(branch))
    }
}
