pub mod coordinator;
mod dispatch;
mod restore;

pub use dispatch::ReminderDispatcher;
pub use restore::restore_recurring_reminders;
