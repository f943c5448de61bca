//! Apply-mode deletions.
//!
//! Candidates are deleted one at a time, in report order. A failed deletion is
//! recorded and never retried; the remaining candidates are still attempted.

use crate::git::RefSource;
use log::{info, warn};

/// Outcome of an apply-mode batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionSummary {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl DeletionSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn record(&mut self, name: &str, errors: Vec<String>) {
        if errors.is_empty() {
            info!("deleted {}", name);
            self.deleted.push(name.to_string());
        } else {
            let reason = errors.join("; ");
            warn!("failed to delete {}: {}", name, reason);
            self.failed.push((name.to_string(), reason));
        }
    }
}

/// Delete each tag locally and on `remote`.
///
/// Both deletions are attempted even if the first fails; a tag counts as
/// failed if either one does.
pub fn delete_tags<R: RefSource>(repo: &R, remote: &str, tags: &[String]) -> DeletionSummary {
    let mut summary = DeletionSummary::default();

    for tag in tags {
        let mut errors = Vec::new();
        if let Err(e) = repo.delete_tag(tag) {
            errors.push(format!("local: {}", e));
        }
        if let Err(e) = repo.delete_remote_tag_ref(remote, tag) {
            errors.push(format!("{}: {}", remote, e));
        }
        summary.record(tag, errors);
    }

    summary
}

/// Delete each branch on `remote`.
pub fn delete_branches<R: RefSource, S: AsRef<str>>(
    repo: &R,
    remote: &str,
    branches: &[S],
) -> DeletionSummary {
    let mut summary = DeletionSummary::default();

    for branch in branches {
        let branch = branch.as_ref();
        let errors = match repo.delete_remote_branch(remote, branch) {
            Ok(()) => Vec::new(),
            Err(e) => vec![e.to_string()],
        };
        summary.record(branch, errors);
    }

    summary
}
