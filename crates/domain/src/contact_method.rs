use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// The addressable channel a message is delivered to. Closed set so that
/// adding a channel is a compile time checked exhaustiveness change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Channel {
    Email(String),
    Phone(String),
}

impl Channel {
    pub fn address(&self) -> &str {
        match self {
            Self::Email(address) => address,
            Self::Phone(number) => number,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Phone(_) => "phone",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactMethod {
    pub id: ID,
    pub user_id: ID,
    pub channel: Channel,
    pub description: String,
    pub created: i64,
    pub updated: i64,
}

impl Entity<ID> for ContactMethod {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
