use remind_domain::{Channel, ContactMethod, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactMethodDTO {
    pub id: ID,
    pub user_id: ID,
    #[serde(flatten)]
    pub channel: Channel,
    pub description: String,
    pub updated: i64,
    pub created: i64,
}

impl ContactMethodDTO {
    pub fn new(contact_method: ContactMethod) -> Self {
        Self {
            id: contact_method.id.clone(),
            user_id: contact_method.user_id.clone(),
            channel: contact_method.channel,
            description: contact_method.description,
            updated: contact_method.updated,
            created: contact_method.created,
        }
    }
}
