//! User interface module - report printing on top of pure formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Printing whole reports with their warnings

pub mod formatter;

use crate::analyzer::{BranchReport, TagReport};
use crate::execute::DeletionSummary;
use crate::warning::CleanupWarning;

// Re-export formatter functions for convenience
pub use formatter::{
    display_dry_run_hint, display_error, display_status, display_success, display_warning,
    format_branch_report, format_deletion_summary, format_tag_report,
};

/// Print warnings, then the full tag report.
pub fn display_tag_report(report: &TagReport) {
    display_warnings(&report.warnings);
    print!("{}", format_tag_report(report));
}

/// Print warnings, then the full branch report.
pub fn display_branch_report(report: &BranchReport) {
    display_warnings(&report.warnings);
    print!("{}", format_branch_report(report));
}

/// Print an apply-mode summary followed by the completion marker.
pub fn display_deletion_summary(kind: &str, summary: &DeletionSummary) {
    print!("{}", format_deletion_summary(kind, summary));
    if summary.has_failures() {
        display_error(&format!(
            "{} {} could not be deleted",
            summary.failed.len(),
            kind
        ));
    } else {
        display_success("Cleanup complete");
    }
}

pub fn display_warnings(warnings: &[CleanupWarning]) {
    for warning in warnings {
        display_warning(warning);
    }
}
