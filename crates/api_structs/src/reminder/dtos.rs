use remind_domain::{Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub user_id: ID,
    pub contact_method_id: ID,
    pub body: String,
    pub start_time: i64,
    pub is_repeating: bool,
    pub period_minutes: i64,
    pub updated: i64,
    pub created: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            user_id: reminder.user_id.clone(),
            contact_method_id: reminder.contact_method_id.clone(),
            body: reminder.body,
            start_time: reminder.start_time,
            is_repeating: reminder.is_repeating,
            period_minutes: reminder.period_minutes,
            updated: reminder.updated,
            created: reminder.created,
        }
    }
}
