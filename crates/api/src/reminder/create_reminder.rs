use crate::error::RemindError;
use crate::scheduling::coordinator::schedule_reminder;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::create_reminder::*;
use remind_domain::{Reminder, ID};
use remind_infra::RemindContext;
use tracing::warn;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindContext>,
) -> Result<HttpResponse, RemindError> {
    let user_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = CreateReminderUseCase {
        user_id,
        contact_method_id: body.contact_method_id,
        body: body.body,
        start_time: body.start_time,
        is_repeating: body.is_repeating.unwrap_or(false),
        period_minutes: body.period_minutes.unwrap_or(0),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(RemindError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user_id: ID,
    pub contact_method_id: ID,
    pub body: String,
    pub start_time: i64,
    pub is_repeating: bool,
    pub period_minutes: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidSchedule(i64),
    ContactMethodNotFound(ID),
    SchedulingFailure,
    StorageError,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidSchedule(period_minutes) => Self::BadClientData(format!(
                "A repeating reminder must have a positive period, got: {}",
                period_minutes
            )),
            UseCaseError::ContactMethodNotFound(contact_method_id) => Self::NotFound(format!(
                "The contact method with id: {}, was not found.",
                contact_method_id
            )),
            UseCaseError::SchedulingFailure => Self::InternalError,
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        if self.is_repeating && self.period_minutes <= 0 {
            return Err(UseCaseError::InvalidSchedule(self.period_minutes));
        }

        match ctx.repos.contact_methods.find(&self.contact_method_id).await {
            Some(contact_method) if contact_method.user_id == self.user_id => contact_method,
            _ => {
                return Err(UseCaseError::ContactMethodNotFound(
                    self.contact_method_id.clone(),
                ))
            }
        };

        let now = ctx.sys.get_timestamp_millis();
        let mut reminder = Reminder {
            id: Default::default(),
            user_id: self.user_id.clone(),
            contact_method_id: self.contact_method_id.clone(),
            body: self.body.clone(),
            start_time: self.start_time,
            is_repeating: self.is_repeating,
            period_minutes: self.period_minutes,
            job_ref: None,
            created: now,
            updated: now,
            deleted_at: None,
        };

        // The row goes in first so the job payload has an id to point at
        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // A reminder must never silently stay persisted but unscheduled
        if let Err(e) = schedule_reminder(ctx, &mut reminder).await {
            warn!(
                "Scheduling reminder {} failed, rolling back the row: {:?}",
                reminder.id, e
            );
            ctx.repos.reminders.delete(&reminder.id, now).await;
            return Err(UseCaseError::SchedulingFailure);
        }

        Ok(reminder)
    }
}
