use crate::domain::{is_older_than, months_ago, partition_release_tags, ReleaseTag, TagOutcome};
use crate::git::{tag_ref, RefSource};
use crate::warning::CleanupWarning;
use chrono::{DateTime, Utc};
use log::debug;

/// Count and age limits for four-digit release tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Newest valid tags that are always kept
    pub keep: usize,
    /// Calendar months a tag's commit must be older than before deletion
    pub months: u32,
}

/// Result of classifying every tag in the repository.
///
/// Each tag name appears in exactly one bucket. Buckets holding valid tags
/// are sorted oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReport {
    pub policy: RetentionPolicy,
    pub cutoff: DateTime<Utc>,
    pub kept_by_count: Vec<String>,
    pub skipped_by_age: Vec<String>,
    pub to_delete: Vec<String>,
    pub invalid_format: Vec<String>,
    pub warnings: Vec<CleanupWarning>,
}

impl TagReport {
    /// Number of valid tags that exceeded the retention count.
    pub fn candidate_count(&self) -> usize {
        self.skipped_by_age.len() + self.to_delete.len()
    }

    pub fn valid_count(&self) -> usize {
        self.kept_by_count.len() + self.candidate_count()
    }

    /// Bucket a tag name was placed in, if it was seen at all.
    pub fn outcome_of(&self, tag: &str) -> Option<TagOutcome> {
        let buckets = [
            (&self.kept_by_count, TagOutcome::KeptByCount),
            (&self.skipped_by_age, TagOutcome::SkippedByAge),
            (&self.to_delete, TagOutcome::Delete),
            (&self.invalid_format, TagOutcome::InvalidFormat),
        ];
        buckets
            .iter()
            .find(|(names, _)| names.iter().any(|n| n == tag))
            .map(|(_, outcome)| *outcome)
    }
}

/// Classifies tags by retention count, then by commit age.
pub struct TagRetentionEngine {
    policy: RetentionPolicy,
}

impl TagRetentionEngine {
    /// Create a new engine for the given policy
    pub fn new(policy: RetentionPolicy) -> Self {
        TagRetentionEngine { policy }
    }

    /// Classify `tags` as of `now`.
    ///
    /// Commit times are only read for tags beyond the retention count. A tag
    /// whose commit time cannot be read is kept (placed in `skipped_by_age`)
    /// and reported as a warning.
    pub fn classify<R: RefSource>(
        &self,
        repo: &R,
        tags: &[String],
        now: DateTime<Utc>,
    ) -> TagReport {
        let cutoff = months_ago(now, self.policy.months);
        let (valid, invalid_format) = partition_release_tags(tags);

        let mut report = TagReport {
            policy: self.policy,
            cutoff,
            kept_by_count: Vec::new(),
            skipped_by_age: Vec::new(),
            to_delete: Vec::new(),
            invalid_format,
            warnings: Vec::new(),
        };

        let (candidates, kept) = split_by_count(&valid, self.policy.keep);
        report.kept_by_count = names(kept);

        for tag in candidates {
            match repo.commit_timestamp(&tag_ref(tag.name())) {
                Ok(commit_time) if is_older_than(commit_time, cutoff) => {
                    debug!("tag {} committed at {}: delete", tag.name(), commit_time);
                    report.to_delete.push(tag.name().to_string());
                }
                Ok(commit_time) => {
                    debug!("tag {} committed at {}: too recent", tag.name(), commit_time);
                    report.skipped_by_age.push(tag.name().to_string());
                }
                Err(e) => {
                    report.warnings.push(CleanupWarning::UnresolvedTimestamp {
                        tag: tag.name().to_string(),
                        reason: e.to_string(),
                    });
                    report.skipped_by_age.push(tag.name().to_string());
                }
            }
        }

        report
    }
}

/// Split sorted tags into the oldest `len - keep` candidates and the newest `keep`.
fn split_by_count(sorted: &[ReleaseTag], keep: usize) -> (&[ReleaseTag], &[ReleaseTag]) {
    let excess = sorted.len().saturating_sub(keep);
    sorted.split_at(excess)
}

fn names(tags: &[ReleaseTag]) -> Vec<String> {
    tags.iter().map(|t| t.name().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use chrono::TimeZone;

    const DAY: i64 = 24 * 60 * 60;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()
    }

    fn engine(keep: usize, months: u32) -> TagRetentionEngine {
        TagRetentionEngine::new(RetentionPolicy { keep, months })
    }

    #[test]
    fn test_under_retention_count_deletes_nothing() {
        let mut repo = MockRepository::new();
        for n in 1..=5 {
            repo.add_tag(format!("{:04}", n), 0);
        }
        let tags = repo.list_tags().unwrap();

        let report = engine(5, 0).classify(&repo, &tags, now());
        assert!(report.to_delete.is_empty());
        assert!(report.skipped_by_age.is_empty());
        assert_eq!(report.kept_by_count.len(), 5);
    }

    #[test]
    fn test_age_decides_among_candidates() {
        let old = now().timestamp() - 400 * DAY;
        let recent = now().timestamp() - 10 * DAY;
        let mut repo = MockRepository::new();
        repo.add_tag("0001", old);
        repo.add_tag("0002", recent);
        repo.add_tag("0003", recent);
        let tags = repo.list_tags().unwrap();

        let report = engine(1, 6).classify(&repo, &tags, now());
        assert_eq!(report.to_delete, vec!["0001"]);
        assert_eq!(report.skipped_by_age, vec!["0002"]);
        assert_eq!(report.kept_by_count, vec!["0003"]);
    }

    #[test]
    fn test_invalid_tags_never_processed() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0", 0);
        repo.add_tag("0001", 0);
        repo.add_tag("12345", 0);
        let tags = repo.list_tags().unwrap();

        let report = engine(0, 0).classify(&repo, &tags, now());
        assert_eq!(report.invalid_format, vec!["v1.0.0", "12345"]);
        assert_eq!(report.to_delete, vec!["0001"]);
        assert_eq!(report.outcome_of("v1.0.0"), Some(TagOutcome::InvalidFormat));
    }

    #[test]
    fn test_unresolved_timestamp_is_kept_with_warning() {
        let mut repo = MockRepository::new();
        repo.add_dangling_tag("0001");
        repo.add_tag("0002", 0);
        let tags = repo.list_tags().unwrap();

        let report = engine(0, 0).classify(&repo, &tags, now());
        assert_eq!(report.skipped_by_age, vec!["0001"]);
        assert_eq!(report.to_delete, vec!["0002"]);
        assert!(matches!(
            report.warnings.as_slice(),
            [CleanupWarning::UnresolvedTimestamp { tag, .. }] if tag == "0001"
        ));
    }

    #[test]
    fn test_commit_exactly_at_cutoff_is_kept() {
        let cutoff = months_ago(now(), 6);
        let mut repo = MockRepository::new();
        repo.add_tag("0001", cutoff.timestamp());
        let tags = repo.list_tags().unwrap();

        let report = engine(0, 6).classify(&repo, &tags, now());
        assert_eq!(report.skipped_by_age, vec!["0001"]);
    }

    #[test]
    fn test_split_by_count() {
        let (valid, _) = partition_release_tags(&["0003", "0001", "0002"]);
        let (candidates, kept) = split_by_count(&valid, 2);
        assert_eq!(names(candidates), vec!["0001"]);
        assert_eq!(names(kept), vec!["0002", "0003"]);

        let (candidates, kept) = split_by_count(&valid, 10);
        assert!(candidates.is_empty());
        assert_eq!(kept.len(), 3);
    }
}
