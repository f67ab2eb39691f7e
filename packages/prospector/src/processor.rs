//! Single-step job advancement.
//!
//! `process_next` is the whole processing surface: one call settles exactly
//! one item and persists the job before returning, so a caller can drive a
//! job to completion by polling, stop at any point, and resume later from
//! whatever the store holds. There is no background loop and no in-memory
//! cursor to lose.
//!
//! The write order inside a step is deliberate: the contact record lands in
//! the record store before the item flips terminal. A crash between the two
//! writes leaves the item pending, and the next call's dedup probe finds the
//! record and settles the item without re-extracting.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ProspectorError, Result};
use crate::pipeline::ExtractionPipeline;
use crate::traits::store::{JobStore, RecordStore};
use crate::types::job::{ItemStatus, StepOutcome};
use crate::types::record::{ContactRecord, IdentityKey};

/// Advances jobs one item at a time.
pub struct BatchProcessor {
    jobs: Arc<dyn JobStore>,
    records: Arc<dyn RecordStore>,
    pipeline: ExtractionPipeline,
}

impl BatchProcessor {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        records: Arc<dyn RecordStore>,
        pipeline: ExtractionPipeline,
    ) -> Self {
        Self {
            jobs,
            records,
            pipeline,
        }
    }

    /// Settle the job's first pending item and persist the result.
    ///
    /// Calling this on a completed job is a no-op that reports the final
    /// counters, so pollers can over-call safely. An item whose record
    /// write fails is marked failed (it will not be retried), the job still
    /// advances, and the failure is surfaced for this call only.
    ///
    /// There is no per-job lock: concurrent calls for the same job id can
    /// select the same pending item. The dedup key keeps the record unique
    /// even then; the wasted work is the extra extraction, not a duplicate.
    pub async fn process_next(&self, job_id: Uuid) -> Result<StepOutcome> {
        let mut job = self
            .jobs
            .load_job(job_id)
            .await?
            .ok_or(ProspectorError::JobNotFound(job_id))?;

        if job.is_completed() {
            debug!(job_id = %job.id, "job already completed");
            return Ok(StepOutcome::finished(&job));
        }

        let Some(index) = job.first_pending() else {
            // Every item is terminal but the job status never caught up,
            // which happens when a crash landed between the last item
            // settlement and the job save.
            job.mark_completed();
            self.jobs.save_job(&job).await?;
            info!(job_id = %job.id, "no pending items left, job closed");
            return Ok(StepOutcome::finished(&job));
        };

        let item = job.items[index].clone();
        let key = IdentityKey::new(&job.owner, &item.name, &item.locator);

        if self.records.record_exists(&key).await? {
            debug!(
                job_id = %job.id,
                item = %item.name,
                "record already exists, settling item without extraction"
            );
            job.settle_item(index, ItemStatus::Completed);
            self.jobs.save_job(&job).await?;
            return Ok(StepOutcome::advanced(&job, None));
        }

        info!(
            job_id = %job.id,
            item = %item.name,
            index,
            total = job.total_items,
            "processing item"
        );

        let fields = self.pipeline.extract(&item.locator).await;
        debug!(
            item = %item.name,
            populated = fields.populated(),
            "extraction finished"
        );

        let record = ContactRecord::new(key, fields, job.id);
        match self.records.create_record(&record).await {
            Ok(record_id) => {
                job.settle_item(index, ItemStatus::Completed);
                self.jobs.save_job(&job).await?;
                info!(
                    job_id = %job.id,
                    item = %item.name,
                    record_id = %record_id,
                    processed = job.processed_items,
                    total = job.total_items,
                    "item completed"
                );
                Ok(StepOutcome::advanced(&job, Some(record)))
            }
            Err(ProspectorError::RecordExists { .. }) => {
                // Someone else inserted this key between our probe and our
                // write. Same convergence as the probe hit above.
                debug!(job_id = %job.id, item = %item.name, "record raced into existence");
                job.settle_item(index, ItemStatus::Completed);
                self.jobs.save_job(&job).await?;
                Ok(StepOutcome::advanced(&job, None))
            }
            Err(error) => {
                warn!(
                    job_id = %job.id,
                    item = %item.name,
                    error = %error,
                    "record write failed, marking item failed"
                );
                job.settle_item(index, ItemStatus::Failed);
                self.jobs.save_job(&job).await?;
                Err(ProspectorError::ItemProcessing {
                    item: item.name,
                    source: Box::new(error),
                })
            }
        }
    }
}
