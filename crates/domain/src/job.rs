use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

/// Identifier of a scheduled one shot job
pub type JobId = ID;

/// Handle into the job queue's in process recurring job registry
pub type RecurringHandle = i64;

/// Pointer from a `Reminder` to its currently live job. Owned and mutated
/// only by the scheduling coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ref", rename_all = "camelCase")]
pub enum JobRef {
    OneShot(JobId),
    Recurring(RecurringHandle),
}

/// Payload carried by every reminder job. Deliberately only the id:
/// message body and contact address are resolved at fire time so that
/// edits made after scheduling are honored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderJobArgs {
    pub reminder_id: ID,
}

impl ReminderJobArgs {
    pub fn new(reminder_id: ID) -> Self {
        Self { reminder_id }
    }

    /// Stable key used by the job queue to deduplicate recurring
    /// registrations for the same reminder
    pub fn dedup_key(&self) -> String {
        format!("reminder-{}", self.reminder_id)
    }
}
