//! Job and item state for resumable extraction runs.
//!
//! A `Job` owns an ordered list of `Item`s fixed at creation time. Progress
//! is expressed entirely through item statuses plus two counters, so a job
//! loaded from storage carries everything needed to resume: there is no
//! in-memory state to lose between calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::record::ContactRecord;

// ============================================================================
// Statuses
// ============================================================================

/// Lifecycle of a job. `Completed` is terminal; there is no failed state at
/// the job level, since a job with failed items still completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Active => "active",
            JobStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "active" => Some(JobStatus::Active),
            "completed" => Some(JobStatus::Completed),
            _ => None,
        }
    }
}

/// Lifecycle of a single item. Terminal once non-pending; failed items are
/// never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl ItemStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ItemStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Completed => "completed",
            ItemStatus::Failed => "failed",
        }
    }
}

// ============================================================================
// Item
// ============================================================================

/// One discovered entity awaiting field extraction. Lives inside a job,
/// never stored independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    /// Opaque address used by discovery and by the listing stage.
    pub locator: String,
    pub status: ItemStatus,
}

impl Item {
    pub fn new(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            status: ItemStatus::Pending,
        }
    }
}

// ============================================================================
// Job
// ============================================================================

/// A persisted unit of work: ordered items plus aggregate progress.
///
/// Owned by the job store and mutated only by the batch processor. The item
/// order is fixed at creation; processing always advances left-to-right
/// through pending items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub owner: String,
    pub source_query: String,
    pub status: JobStatus,
    pub total_items: usize,
    pub processed_items: usize,
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a pending job over a discovered item list.
    pub fn new(owner: impl Into<String>, source_query: impl Into<String>, items: Vec<Item>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            source_query: source_query.into(),
            status: JobStatus::Pending,
            total_items: items.len(),
            processed_items: 0,
            items,
            created_at: now,
            updated_at: now,
        }
    }

    /// Index of the first pending item, scanning in discovery order.
    pub fn first_pending(&self) -> Option<usize> {
        self.items.iter().position(|i| i.status == ItemStatus::Pending)
    }

    /// Number of items in a terminal status.
    pub fn terminal_count(&self) -> usize {
        self.items.iter().filter(|i| i.status.is_terminal()).count()
    }

    /// Move one item to a terminal status and bring the counters with it.
    ///
    /// `processed_items` is recomputed from the item list rather than
    /// incremented, so the counter invariant holds even if the same index
    /// is settled twice. Flips the job to `Completed` once every item is
    /// terminal, and to `Active` on the first settlement of a pending job.
    pub fn settle_item(&mut self, index: usize, status: ItemStatus) {
        if let Some(item) = self.items.get_mut(index) {
            item.status = status;
        }
        self.processed_items = self.terminal_count();
        self.status = if self.processed_items == self.total_items {
            JobStatus::Completed
        } else {
            JobStatus::Active
        };
        self.updated_at = Utc::now();
    }

    /// Mark the job completed without touching items (used when a resumed
    /// job turns out to have no pending items left).
    pub fn mark_completed(&mut self) {
        self.status = JobStatus::Completed;
        self.processed_items = self.terminal_count();
        self.updated_at = Utc::now();
    }

    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }
}

// ============================================================================
// Step results
// ============================================================================

/// What `initialize` hands back: enough for the caller to start polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializedJob {
    pub job_id: Uuid,
    pub total_items: usize,
}

/// Result of advancing a job by one item.
///
/// `record` is `None` both when the job was already complete (nothing to do)
/// and when the item failed; `processed`/`total` always reflect the job as
/// persisted at the end of the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub record: Option<ContactRecord>,
    pub processed: usize,
    pub total: usize,
    pub completed: bool,
}

impl StepOutcome {
    /// Outcome for a job that is already finished: counters only.
    pub fn finished(job: &Job) -> Self {
        Self {
            record: None,
            processed: job.processed_items,
            total: job.total_items,
            completed: true,
        }
    }

    /// Outcome after settling one item, reflecting the job as persisted.
    pub fn advanced(job: &Job, record: Option<ContactRecord>) -> Self {
        Self {
            record,
            processed: job.processed_items,
            total: job.total_items,
            completed: job.is_completed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_item_job() -> Job {
        Job::new(
            "owner-1",
            "https://directory.test/search?q=plumbers",
            vec![
                Item::new("Alpha", "https://directory.test/place/alpha"),
                Item::new("Beta", "https://directory.test/place/beta"),
                Item::new("Gamma", "https://directory.test/place/gamma"),
            ],
        )
    }

    #[test]
    fn new_job_starts_pending_with_zero_progress() {
        let job = three_item_job();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.total_items, 3);
        assert_eq!(job.processed_items, 0);
        assert!(job.items.iter().all(|i| i.status == ItemStatus::Pending));
    }

    #[test]
    fn first_pending_scans_in_order() {
        let mut job = three_item_job();
        assert_eq!(job.first_pending(), Some(0));
        job.settle_item(0, ItemStatus::Completed);
        assert_eq!(job.first_pending(), Some(1));
        job.settle_item(1, ItemStatus::Failed);
        assert_eq!(job.first_pending(), Some(2));
    }

    #[test]
    fn settle_item_keeps_counter_in_sync() {
        let mut job = three_item_job();
        job.settle_item(0, ItemStatus::Completed);
        assert_eq!(job.processed_items, 1);
        assert_eq!(job.status, JobStatus::Active);

        // Settling the same index again must not double-count.
        job.settle_item(0, ItemStatus::Completed);
        assert_eq!(job.processed_items, 1);
    }

    #[test]
    fn settling_last_item_completes_job() {
        let mut job = three_item_job();
        job.settle_item(0, ItemStatus::Completed);
        job.settle_item(1, ItemStatus::Failed);
        job.settle_item(2, ItemStatus::Completed);
        assert_eq!(job.processed_items, 3);
        assert!(job.is_completed());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [JobStatus::Pending, JobStatus::Active, JobStatus::Completed] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("bogus"), None);
    }
}
