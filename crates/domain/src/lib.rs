mod contact_method;
mod job;
mod reminder;
mod shared;

pub use contact_method::{Channel, ContactMethod};
pub use job::{JobId, JobRef, RecurringHandle, ReminderJobArgs};
pub use reminder::Reminder;
pub use shared::entity::{Entity, ID};
