use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use remind_domain::{Reminder, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders).filter(|r: &Reminder| !r.is_deleted())
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder> {
        let mut reminders = find_by(&self.reminders, |r: &Reminder| {
            r.user_id == *user_id && !r.is_deleted()
        });
        reminders.sort_by_key(|r| r.start_time);
        reminders
    }

    async fn find_active_recurring(&self) -> Vec<Reminder> {
        find_by(&self.reminders, |r: &Reminder| {
            r.is_repeating && r.period_minutes > 0 && !r.is_deleted()
        })
    }

    async fn delete(&self, reminder_id: &ID, deleted_at: i64) -> Option<Reminder> {
        let mut reminder = self.find(reminder_id).await?;
        reminder.deleted_at = Some(deleted_at);
        save(&reminder, &self.reminders);
        Some(reminder)
    }
}
