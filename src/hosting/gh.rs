use crate::error::{GitTidyError, Result};
use crate::hosting::MergeStatusSource;
use log::{debug, warn};
use serde::Deserialize;
use std::process::Command;

/// State reported by the hosting service for a merged pull request.
const MERGED_STATE: &str = "MERGED";

#[derive(Debug, Deserialize)]
struct PullRequestState {
    state: String,
}

/// Merged pull request lookups through the GitHub CLI (`gh`).
///
/// Availability is probed once with `gh auth status`. When the binary is
/// missing or not logged in, every lookup answers `false`.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    unavailable: Option<String>,
}

impl GhCli {
    /// Probe the `gh` binary on `PATH`.
    pub fn detect() -> Self {
        Self::detect_program("gh")
    }

    /// Probe a specific executable.
    pub fn detect_program(program: impl Into<String>) -> Self {
        let program = program.into();
        let unavailable = match probe(&program) {
            Ok(()) => None,
            Err(e) => {
                warn!("hosting lookups disabled: {}", e);
                Some(e.to_string())
            }
        };
        GhCli {
            program,
            unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        self.unavailable.is_none()
    }

    fn merged_pr_lookup(&self, branch: &str) -> Result<bool> {
        let output = Command::new(&self.program)
            .args(pr_list_args(branch))
            .output()
            .map_err(|e| GitTidyError::hosting(format!("failed to execute gh pr list: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitTidyError::hosting(format!(
                "gh pr list failed: {}",
                stderr.trim()
            )));
        }

        any_merged(&output.stdout)
    }
}

/// Arguments listing only merged pull requests for `branch`, so the default
/// result limit cannot hide a merged one behind open or closed ones.
fn pr_list_args(branch: &str) -> [&str; 8] {
    [
        "pr", "list", "--head", branch, "--state", "merged", "--json", "state",
    ]
}

fn probe(program: &str) -> Result<()> {
    let output = Command::new(program)
        .args(["auth", "status"])
        .output()
        .map_err(|e| GitTidyError::hosting(format!("'{}' is not installed: {}", program, e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(GitTidyError::hosting(format!(
            "'{}' is not authenticated",
            program
        )))
    }
}

/// Whether a `gh pr list --json state` payload contains a merged pull request.
pub(crate) fn any_merged(payload: &[u8]) -> Result<bool> {
    let prs: Vec<PullRequestState> = serde_json::from_slice(payload)
        .map_err(|e| GitTidyError::hosting(format!("unexpected gh output: {}", e)))?;
    Ok(prs.iter().any(|pr| pr.state == MERGED_STATE))
}

impl MergeStatusSource for GhCli {
    fn merged_pr_exists(&self, branch: &str) -> bool {
        if !self.is_available() {
            return false;
        }
        match self.merged_pr_lookup(branch) {
            Ok(merged) => merged,
            Err(e) => {
                debug!("pull request lookup for '{}' failed: {}", branch, e);
                false
            }
        }
    }

    fn unavailable_reason(&self) -> Option<String> {
        self.unavailable.clone()
    }
}
