use super::valid_channel;
use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::create_contact_method::*;
use remind_domain::{Channel, ContactMethod, ID};
use remind_infra::RemindContext;

pub async fn create_contact_method_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindContext>,
) -> Result<HttpResponse, RemindError> {
    let user_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = CreateContactMethodUseCase {
        user_id,
        channel: body.channel,
        description: body.description.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|contact_method| HttpResponse::Created().json(APIResponse::new(contact_method)))
        .map_err(RemindError::from)
}

#[derive(Debug)]
pub struct CreateContactMethodUseCase {
    pub user_id: ID,
    pub channel: Channel,
    pub description: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidAddress(String),
    StorageError,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidAddress(address) => {
                Self::BadClientData(format!("Invalid contact address: `{}`", address))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateContactMethodUseCase {
    type Response = ContactMethod;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateContactMethod";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        if !valid_channel(&self.channel) {
            return Err(UseCaseError::InvalidAddress(
                self.channel.address().to_string(),
            ));
        }

        let now = ctx.sys.get_timestamp_millis();
        let contact_method = ContactMethod {
            id: Default::default(),
            user_id: self.user_id.clone(),
            channel: self.channel.clone(),
            description: self.description.clone(),
            created: now,
            updated: now,
        };

        ctx.repos
            .contact_methods
            .insert(&contact_method)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(contact_method)
    }
}
