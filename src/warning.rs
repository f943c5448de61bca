use std::fmt;

/// Non-fatal conditions encountered during a cleanup run.
/// These never abort the run but are always shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupWarning {
    /// The commit a tag points to could not be resolved to a timestamp
    UnresolvedTimestamp { tag: String, reason: String },
    /// The issue-tracker export is absent, so the issue-safety layer is off
    IssuesFileMissing { path: String },
    /// The same task ID appears on more than one row of the issue export
    DuplicateIssueId { id: u32, kept_status: String },
    /// The hosting client cannot be used for merged-PR lookups
    HostingUnavailable { reason: String },
    /// Fetching or pruning the remote failed
    FetchFailed { remote: String, reason: String },
    /// The ancestor test for a branch errored
    AncestorCheckFailed { branch: String, reason: String },
}

impl fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupWarning::UnresolvedTimestamp { tag, reason } => {
                write!(
                    f,
                    "Cannot read commit time for tag '{}', skipping it: {}",
                    tag, reason
                )
            }
            CleanupWarning::IssuesFileMissing { path } => {
                write!(
                    f,
                    "Issue file '{}' not found; issue safety checks are disabled",
                    path
                )
            }
            CleanupWarning::DuplicateIssueId { id, kept_status } => {
                write!(
                    f,
                    "Task {} appears more than once in the issue file; using the last row (status '{}')",
                    id, kept_status
                )
            }
            CleanupWarning::HostingUnavailable { reason } => {
                write!(
                    f,
                    "Pull request lookup disabled ({}); only ancestry is used to detect merges",
                    reason
                )
            }
            CleanupWarning::FetchFailed { remote, reason } => {
                write!(
                    f,
                    "Could not fetch from remote '{}': {}. Using local remote-tracking refs",
                    remote, reason
                )
            }
            CleanupWarning::AncestorCheckFailed { branch, reason } => {
                write!(
                    f,
                    "Ancestry check failed for branch '{}', treating as not merged by git: {}",
                    branch, reason
                )
            }
        }
    }
}
