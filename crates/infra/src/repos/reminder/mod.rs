mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use remind_domain::{Reminder, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// Finds a reminder that is not soft deleted
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder>;
    /// All repeating reminders that are not soft deleted, used by the
    /// startup restore pass
    async fn find_active_recurring(&self) -> Vec<Reminder>;
    /// Soft deletes the reminder and returns it
    async fn delete(&self, reminder_id: &ID, deleted_at: i64) -> Option<Reminder>;
}
