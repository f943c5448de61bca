use std::fmt;

/// How a branch was found to be merged into the default branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeMethod {
    /// The branch tip is an ancestor of the default branch tip
    Git,
    /// The hosting service reports a merged pull request for the branch
    PullRequest,
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeMethod::Git => write!(f, "GIT"),
            MergeMethod::PullRequest => write!(f, "PR"),
        }
    }
}

/// Status of the task a branch refers to, as far as the issue export knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueStatus {
    /// The branch name carries no task ID
    NoTask,
    /// The task ID is not present in the export
    NotFound,
    /// The task is closed
    Closed,
    /// The task exists with any other (lowercased) status
    Active(String),
}

impl IssueStatus {
    /// Build a status from a raw export value, comparing case-insensitively.
    pub fn from_raw(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        if normalized == "closed" {
            IssueStatus::Closed
        } else {
            IssueStatus::Active(normalized)
        }
    }

    /// Only a known, not-closed task holds back a merged branch.
    pub fn blocks_deletion(&self) -> bool {
        matches!(self, IssueStatus::Active(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, IssueStatus::Closed)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueStatus::NoTask => write!(f, "NO_TASK"),
            IssueStatus::NotFound => write!(f, "NOT_FOUND"),
            IssueStatus::Closed => write!(f, "closed"),
            IssueStatus::Active(status) => write!(f, "{}", status),
        }
    }
}

/// The single bucket a branch ends up in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    Protected,
    Delete(MergeMethod),
    SavedByIssue(IssueStatus),
    NotMerged,
    ClosedIssueUnmerged,
}

/// The single bucket a tag ends up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    KeptByCount,
    SkippedByAge,
    Delete,
    InvalidFormat,
}
