mod contact_method;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::contact_method::dtos::*;
    pub use crate::reminder::dtos::*;
}

pub use crate::contact_method::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
