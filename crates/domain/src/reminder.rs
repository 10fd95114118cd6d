use crate::shared::entity::{Entity, ID};
use crate::JobRef;

/// A user owned record describing when and what message to deliver
/// through one of the user's `ContactMethod`s.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: ID,
    pub user_id: ID,
    pub contact_method_id: ID,
    pub body: String,
    /// First (or only) fire time in millis
    pub start_time: i64,
    pub is_repeating: bool,
    /// Interval between fires, only meaningful when `is_repeating` is set
    pub period_minutes: i64,
    /// Pointer to the currently live job in the job queue, if any.
    /// For recurring reminders this is not durable across a process
    /// restart and is refreshed by the startup restore pass.
    pub job_ref: Option<JobRef>,
    pub created: i64,
    pub updated: i64,
    /// Soft delete timestamp in millis
    pub deleted_at: Option<i64>,
}

impl Reminder {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// A repeating reminder must have a positive period
    pub fn has_valid_schedule(&self) -> bool {
        !self.is_repeating || self.period_minutes > 0
    }
}

impl Entity<ID> for Reminder {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validates_schedule() {
        let mut reminder = Reminder {
            id: Default::default(),
            user_id: Default::default(),
            contact_method_id: Default::default(),
            body: "Drink water".into(),
            start_time: 0,
            is_repeating: false,
            period_minutes: 0,
            job_ref: None,
            created: 0,
            updated: 0,
            deleted_at: None,
        };
        assert!(reminder.has_valid_schedule());

        reminder.is_repeating = true;
        assert!(!reminder.has_valid_schedule());
        reminder.period_minutes = -15;
        assert!(!reminder.has_valid_schedule());
        reminder.period_minutes = 15;
        assert!(reminder.has_valid_schedule());
    }
}
