//! Pure formatting functions for UI output.
//!
//! Report rendering builds strings so it can be tested; the `display_*`
//! functions only print.

use std::fmt::Write;

use console::style;

use crate::analyzer::{BranchReport, TagReport};
use crate::domain::MergeMethod;
use crate::execute::DeletionSummary;
use crate::warning::CleanupWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal warning.
pub fn display_warning(warning: &CleanupWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render a titled bucket: count header plus one line per member.
fn write_bucket<I, S>(out: &mut String, title: &str, members: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let members: Vec<S> = members.into_iter().collect();
    let _ = writeln!(out, "\n{} ({})", style(title).bold(), members.len());
    if members.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for member in &members {
        let _ = writeln!(out, "  - {}", member.as_ref());
    }
}

/// Render every tag bucket and a summary line.
pub fn format_tag_report(report: &TagReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} keep newest {}, delete only commits before {} ({} months)",
        style("Tag retention policy:").bold(),
        report.policy.keep,
        report.cutoff.format("%Y-%m-%d %H:%M:%S UTC"),
        report.policy.months
    );

    write_bucket(&mut out, "Invalid format (ignored)", &report.invalid_format);
    write_bucket(&mut out, "Kept by count", &report.kept_by_count);
    let unresolved: Vec<&str> = report
        .warnings
        .iter()
        .filter_map(|w| match w {
            CleanupWarning::UnresolvedTimestamp { tag, .. } => Some(tag.as_str()),
            _ => None,
        })
        .collect();
    write_bucket(
        &mut out,
        "Skipped: too recent",
        report.skipped_by_age.iter().map(|tag| {
            if unresolved.contains(&tag.as_str()) {
                format!("{} (commit time unreadable)", tag)
            } else {
                tag.clone()
            }
        }),
    );
    write_bucket(&mut out, "To delete", &report.to_delete);

    let _ = writeln!(
        out,
        "\n{} {} valid tags, {} kept by count, {} too recent, {} to delete, {} invalid",
        style("Summary:").bold(),
        report.valid_count(),
        report.kept_by_count.len(),
        report.skipped_by_age.len(),
        report.to_delete.len(),
        report.invalid_format.len()
    );
    out
}

/// Render every branch bucket and a summary with the per-method split.
pub fn format_branch_report(report: &BranchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} default branch '{}', issue checks {}",
        style("Branch cleanup:").bold(),
        report.default_branch,
        if report.issue_layer_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    write_bucket(&mut out, "Protected", &report.protected);
    write_bucket(
        &mut out,
        "To delete",
        report
            .to_delete
            .iter()
            .map(|(name, method)| format!("{} [{}]", name, method)),
    );
    write_bucket(
        &mut out,
        "Saved by open issue",
        report
            .saved_by_issue
            .iter()
            .map(|(name, status)| format!("{} (status: {})", name, status)),
    );
    write_bucket(&mut out, "Skipped: not merged", &report.skipped_not_merged);
    write_bucket(
        &mut out,
        "Closed issue but not merged (review manually)",
        &report.closed_issue_unmerged,
    );

    let _ = writeln!(
        out,
        "\n{} {} branches, {} protected, {} to delete ({} {}, {} {}), {} saved by issue, {} not merged, {} closed issue unmerged",
        style("Summary:").bold(),
        report.total(),
        report.protected.len(),
        report.to_delete.len(),
        report.count_by_method(MergeMethod::Git),
        MergeMethod::Git,
        report.count_by_method(MergeMethod::PullRequest),
        MergeMethod::PullRequest,
        report.saved_by_issue.len(),
        report.skipped_not_merged.len(),
        report.closed_issue_unmerged.len()
    );
    out
}

/// Render the result of an apply-mode batch.
pub fn format_deletion_summary(kind: &str, summary: &DeletionSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nDeleted {} {}, {} failed",
        summary.deleted.len(),
        kind,
        summary.failed.len()
    );
    for (name, reason) in &summary.failed {
        let _ = writeln!(out, "  {} {}: {}", style("✗").red(), name, reason);
    }
    out
}

/// Print the dry-run hint after a report.
pub fn display_dry_run_hint() {
    println!(
        "\n{} Dry run: nothing was deleted. Re-run with {} to delete.",
        style("→").yellow(),
        style("--apply").cyan()
    );
}
