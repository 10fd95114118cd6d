use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::get_contact_methods::*;
use remind_domain::{ContactMethod, ID};
use remind_infra::RemindContext;

pub async fn get_contact_methods_controller(
    http_req: HttpRequest,
    ctx: web::Data<RemindContext>,
) -> Result<HttpResponse, RemindError> {
    let user_id = protect_route(&http_req)?;

    let usecase = GetContactMethodsUseCase { user_id };

    execute(usecase, &ctx)
        .await
        .map(|contact_methods| HttpResponse::Ok().json(APIResponse::new(contact_methods)))
        .map_err(RemindError::from)
}

#[derive(Debug)]
pub struct GetContactMethodsUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetContactMethodsUseCase {
    type Response = Vec<ContactMethod>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetContactMethods";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.contact_methods.find_by_user(&self.user_id).await)
    }
}
