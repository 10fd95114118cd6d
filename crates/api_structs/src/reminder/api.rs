use crate::dtos::ReminderDTO;
use remind_domain::{Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub contact_method_id: ID,
        pub body: String,
        pub start_time: i64,
        pub is_repeating: Option<bool>,
        pub period_minutes: Option<i64>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod update_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub contact_method_id: ID,
        pub body: String,
        pub start_time: i64,
        pub is_repeating: Option<bool>,
        pub period_minutes: Option<i64>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}
