mod tokio_queue;

pub use tokio_queue::{RecurringRegistration, TokioJobQueue};

use remind_domain::{JobId, RecurringHandle, ReminderJobArgs};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    /// There is nothing left to deliver, the job must not be retried
    #[error("permanent job failure: {0}")]
    Permanent(String),
    /// The delivery may succeed later, subject to the queue's retry policy
    #[error("transient job failure: {0}")]
    Transient(String),
}

/// The callback invoked by the job queue when a job becomes due
#[async_trait::async_trait]
pub trait IJobWorker: Send + Sync {
    async fn run(&self, args: &ReminderJobArgs) -> Result<(), JobError>;
}

/// Durable-at-least-once execution of scheduled and recurring work.
///
/// The recurring job registry lives in process memory and does not
/// survive a restart, callers own reconciling it from durable state.
#[async_trait::async_trait]
pub trait IJobQueue: Send + Sync {
    /// Inserts a one shot job that fires at `at` millis
    async fn schedule_once(&self, args: ReminderJobArgs, at: i64) -> anyhow::Result<JobId>;
    /// Cancels a pending one shot job. An already absent job is success.
    async fn cancel_once(&self, job_id: &JobId) -> anyhow::Result<()>;
    /// Registers a recurring job anchored at `first_at` millis.
    /// Registration is deduplicated on `dedup_key`: registering a key that
    /// is already live returns the existing handle and starts nothing new.
    async fn register_recurring(
        &self,
        args: ReminderJobArgs,
        first_at: i64,
        interval_minutes: i64,
        dedup_key: String,
    ) -> anyhow::Result<RecurringHandle>;
    /// Removes a recurring registration. An already absent handle is success.
    async fn remove_recurring(&self, handle: RecurringHandle) -> anyhow::Result<()>;
    /// Sets the worker that job firings are delivered to
    fn set_worker(&self, worker: Arc<dyn IJobWorker>);
}
