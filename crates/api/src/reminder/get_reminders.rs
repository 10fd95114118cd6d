use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::get_reminders::*;
use remind_domain::{Reminder, ID};
use remind_infra::RemindContext;

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<RemindContext>,
) -> Result<HttpResponse, RemindError> {
    let user_id = protect_route(&http_req)?;

    let usecase = GetRemindersUseCase { user_id };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(RemindError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
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
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.reminders.find_by_user(&self.user_id).await)
    }
}
