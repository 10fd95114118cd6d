use super::{IJobQueue, IJobWorker, JobError};
use crate::system::ISys;
use remind_domain::{JobId, RecurringHandle, ReminderJobArgs};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, warn};

const MAX_ATTEMPTS: u32 = 5;
const RETRY_BACKOFF_SECS: u64 = 30;

type WorkerSlot = Arc<RwLock<Option<Arc<dyn IJobWorker>>>>;

struct RecurringEntry {
    dedup_key: String,
    interval_minutes: i64,
    task: JoinHandle<()>,
}

/// Job queue backed by tokio timer tasks. One shot jobs sleep until due,
/// recurring jobs loop on their interval. The recurring registry is a map
/// in process memory, lost on restart by design.
pub struct TokioJobQueue {
    sys: Arc<dyn ISys>,
    worker: WorkerSlot,
    one_shot: Arc<Mutex<HashMap<JobId, JoinHandle<()>>>>,
    recurring: Arc<Mutex<HashMap<RecurringHandle, RecurringEntry>>>,
    next_handle: AtomicI64,
}

/// Snapshot of one live recurring registration, used by tests and
/// diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringRegistration {
    pub handle: RecurringHandle,
    pub dedup_key: String,
    pub interval_minutes: i64,
}

impl TokioJobQueue {
    pub fn new(sys: Arc<dyn ISys>) -> Self {
        Self {
            sys,
            worker: Arc::new(RwLock::new(None)),
            one_shot: Arc::new(Mutex::new(HashMap::new())),
            recurring: Arc::new(Mutex::new(HashMap::new())),
            next_handle: AtomicI64::new(1),
        }
    }

    pub fn recurring_registrations(&self) -> Vec<RecurringRegistration> {
        let recurring = self.recurring.lock().unwrap();
        let mut registrations = recurring
            .iter()
            .map(|(handle, entry)| RecurringRegistration {
                handle: *handle,
                dedup_key: entry.dedup_key.clone(),
                interval_minutes: entry.interval_minutes,
            })
            .collect::<Vec<_>>();
        registrations.sort_by_key(|r| r.handle);
        registrations
    }

    pub fn pending_one_shot_count(&self) -> usize {
        self.one_shot.lock().unwrap().len()
    }

    /// Drops every recurring registration without firing anything,
    /// the same state a process restart leaves the registry in
    pub fn simulate_registry_loss(&self) {
        let mut recurring = self.recurring.lock().unwrap();
        for (_, entry) in recurring.drain() {
            entry.task.abort();
        }
    }
}

/// Millis to wait before the first fire. A `first_at` in the past advances
/// by whole intervals so the anchor phase is preserved.
fn initial_delay_millis(now: i64, first_at: i64, interval_millis: i64) -> i64 {
    if first_at > now {
        return first_at - now;
    }
    if interval_millis <= 0 {
        return 0;
    }
    let elapsed = now - first_at;
    interval_millis - (elapsed % interval_millis)
}

async fn fire(worker_slot: WorkerSlot, args: ReminderJobArgs) {
    let mut backoff = Duration::from_secs(RETRY_BACKOFF_SECS);
    for attempt in 1..=MAX_ATTEMPTS {
        let worker = worker_slot.read().unwrap().clone();
        let worker = match worker {
            Some(worker) => worker,
            None => {
                error!("Job fired but no worker is registered, dropping it");
                return;
            }
        };
        match worker.run(&args).await {
            Ok(_) => return,
            Err(JobError::Permanent(e)) => {
                error!("Job for reminder {} failed permanently: {}", args.reminder_id, e);
                return;
            }
            Err(JobError::Transient(e)) => {
                warn!(
                    "Job for reminder {} failed (attempt {}/{}): {}",
                    args.reminder_id, attempt, MAX_ATTEMPTS, e
                );
                if attempt < MAX_ATTEMPTS {
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }
    error!(
        "Job for reminder {} gave up after {} attempts",
        args.reminder_id, MAX_ATTEMPTS
    );
}

#[async_trait::async_trait]
impl IJobQueue for TokioJobQueue {
    async fn schedule_once(&self, args: ReminderJobArgs, at: i64) -> anyhow::Result<JobId> {
        let job_id = JobId::default();
        let delay = initial_delay_millis(self.sys.get_timestamp_millis(), at, 0).max(0);

        let worker = self.worker.clone();
        let one_shot = self.one_shot.clone();
        let task_job_id = job_id.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
            fire(worker, args).await;
            one_shot.lock().unwrap().remove(&task_job_id);
        });
        self.one_shot.lock().unwrap().insert(job_id.clone(), task);

        Ok(job_id)
    }

    async fn cancel_once(&self, job_id: &JobId) -> anyhow::Result<()> {
        if let Some(task) = self.one_shot.lock().unwrap().remove(job_id) {
            task.abort();
        }
        Ok(())
    }

    async fn register_recurring(
        &self,
        args: ReminderJobArgs,
        first_at: i64,
        interval_minutes: i64,
        dedup_key: String,
    ) -> anyhow::Result<RecurringHandle> {
        if interval_minutes <= 0 {
            return Err(anyhow::anyhow!(
                "Recurring interval must be positive, got: {}",
                interval_minutes
            ));
        }

        let interval_millis = interval_minutes * 60 * 1000;
        let delay = initial_delay_millis(self.sys.get_timestamp_millis(), first_at, interval_millis);

        // The dedup check and the insert happen under one guard, parallel
        // registrations with the same key must not both spawn a firer
        let mut recurring = self.recurring.lock().unwrap();
        if let Some((handle, _)) = recurring
            .iter()
            .find(|(_, entry)| entry.dedup_key == dedup_key)
        {
            return Ok(*handle);
        }

        let worker = self.worker.clone();
        let interval = Duration::from_millis(interval_millis as u64);
        let first_fire = tokio::time::Instant::now() + Duration::from_millis(delay as u64);
        let task = tokio::spawn(async move {
            // Every deadline is computed from the anchor. Fires run in their
            // own task so a slow or retried delivery never shifts the cadence
            let mut deadline = first_fire;
            loop {
                tokio::time::sleep_until(deadline).await;
                tokio::spawn(fire(worker.clone(), args.clone()));
                deadline += interval;
            }
        });

        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        recurring.insert(
            handle,
            RecurringEntry {
                dedup_key,
                interval_minutes,
                task,
            },
        );

        Ok(handle)
    }

    async fn remove_recurring(&self, handle: RecurringHandle) -> anyhow::Result<()> {
        if let Some(entry) = self.recurring.lock().unwrap().remove(&handle) {
            entry.task.abort();
        }
        Ok(())
    }

    fn set_worker(&self, worker: Arc<dyn IJobWorker>) {
        *self.worker.write().unwrap() = Some(worker);
    }
}
