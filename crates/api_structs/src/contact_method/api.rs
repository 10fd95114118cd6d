use crate::dtos::ContactMethodDTO;
use remind_domain::{Channel, ContactMethod, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMethodResponse {
    pub contact_method: ContactMethodDTO,
}

impl ContactMethodResponse {
    pub fn new(contact_method: ContactMethod) -> Self {
        Self {
            contact_method: ContactMethodDTO::new(contact_method),
        }
    }
}

pub mod create_contact_method {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(flatten)]
        pub channel: Channel,
        pub description: Option<String>,
    }

    pub type APIResponse = ContactMethodResponse;
}

pub mod get_contact_methods {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub contact_methods: Vec<ContactMethodDTO>,
    }

    impl APIResponse {
        pub fn new(contact_methods: Vec<ContactMethod>) -> Self {
            Self {
                contact_methods: contact_methods
                    .into_iter()
                    .map(ContactMethodDTO::new)
                    .collect(),
            }
        }
    }
}

pub mod update_contact_method {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub contact_method_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(flatten)]
        pub channel: Channel,
        pub description: Option<String>,
    }

    pub type APIResponse = ContactMethodResponse;
}

pub mod delete_contact_method {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub contact_method_id: ID,
    }

    pub type APIResponse = ContactMethodResponse;
}
