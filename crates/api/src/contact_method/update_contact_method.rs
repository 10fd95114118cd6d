use super::valid_channel;
use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::update_contact_method::*;
use remind_domain::{Channel, ContactMethod, ID};
use remind_infra::RemindContext;

pub async fn update_contact_method_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindContext>,
) -> Result<HttpResponse, RemindError> {
    let user_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = UpdateContactMethodUseCase {
        user_id,
        contact_method_id: path_params.contact_method_id.clone(),
        channel: body.channel,
        description: body.description,
    };

    execute(usecase, &ctx)
        .await
        .map(|contact_method| HttpResponse::Ok().json(APIResponse::new(contact_method)))
        .map_err(RemindError::from)
}

#[derive(Debug)]
pub struct UpdateContactMethodUseCase {
    pub user_id: ID,
    pub contact_method_id: ID,
    pub channel: Channel,
    pub description: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidAddress(String),
    StorageError,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(contact_method_id) => Self::NotFound(format!(
                "The contact method with id: {}, was not found.",
                contact_method_id
            )),
            UseCaseError::InvalidAddress(address) => {
                Self::BadClientData(format!("Invalid contact address: `{}`", address))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateContactMethodUseCase {
    type Response = ContactMethod;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateContactMethod";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        let mut contact_method = match ctx.repos.contact_methods.find(&self.contact_method_id).await
        {
            Some(contact_method) if contact_method.user_id == self.user_id => contact_method,
            _ => return Err(UseCaseError::NotFound(self.contact_method_id.clone())),
        };

        if !valid_channel(&self.channel) {
            return Err(UseCaseError::InvalidAddress(
                self.channel.address().to_string(),
            ));
        }

        contact_method.channel = self.channel.clone();
        if let Some(description) = &self.description {
            contact_method.description = description.clone();
        }
        contact_method.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .contact_methods
            .save(&contact_method)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(contact_method)
    }
}
