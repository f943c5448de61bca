//! Task status lookup backed by an issue-tracker CSV export.
//!
//! The export has a header row; column 1 holds the numeric task ID and
//! column 3 the status. Other columns are ignored.

use crate::domain::{task_id, IssueStatus};
use crate::error::Result;
use crate::warning::CleanupWarning;
use log::debug;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const ID_COLUMN: usize = 0;
const STATUS_COLUMN: usize = 2;

/// In-memory index of task ID to lowercased status.
///
/// When an ID appears on several rows the last row wins; every such ID is
/// reported through [IssueIndex::duplicate_warnings].
#[derive(Debug, Clone, Default)]
pub struct IssueIndex {
    statuses: HashMap<u32, String>,
    duplicates: Vec<u32>,
}

impl IssueIndex {
    /// Load the export at `path`, or `Ok(None)` if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::from_csv(reader).map(Some)
    }

    /// Parse an export from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut index = IssueIndex::default();

        for record in reader.records() {
            let record = record?;
            let Some(id) = record.get(ID_COLUMN).and_then(parse_task_id) else {
                debug!("skipping issue row without numeric id: {:?}", record);
                continue;
            };
            let status = record.get(STATUS_COLUMN).unwrap_or("").to_lowercase();

            if index.statuses.insert(id, status).is_some() && !index.duplicates.contains(&id) {
                index.duplicates.push(id);
            }
        }

        debug!("loaded {} issue records", index.statuses.len());
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Status of the task with the given ID.
    pub fn status(&self, id: u32) -> IssueStatus {
        match self.statuses.get(&id) {
            Some(raw) => IssueStatus::from_raw(raw),
            None => IssueStatus::NotFound,
        }
    }

    /// Status of the task referenced by a branch's five-digit prefix.
    pub fn status_for_branch(&self, branch: &str) -> IssueStatus {
        match task_id(branch) {
            Some(id) => self.status(id),
            None => IssueStatus::NoTask,
        }
    }

    /// One warning per task ID that appeared on more than one row.
    pub fn duplicate_warnings(&self) -> Vec<CleanupWarning> {
        self.duplicates
            .iter()
            .map(|id| CleanupWarning::DuplicateIssueId {
                id: *id,
                kept_status: self.statuses.get(id).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

/// A task ID cell must be ASCII digits only; signs and spaces are rejected.
fn parse_task_id(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
