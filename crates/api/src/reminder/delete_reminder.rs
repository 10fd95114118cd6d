use crate::error::RemindError;
use crate::scheduling::coordinator::cancel_reminder_job;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::delete_reminder::*;
use remind_domain::{Reminder, ID};
use remind_infra::RemindContext;

pub async fn delete_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<RemindContext>,
) -> Result<HttpResponse, RemindError> {
    let user_id = protect_route(&http_req)?;

    let usecase = DeleteReminderUseCase {
        user_id,
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(RemindError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        let _guard = ctx.locks.acquire(&self.reminder_id).await;

        let reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        // A job the queue has already lost, for example right after a
        // restart before the restore pass ran, still deletes cleanly
        cancel_reminder_job(ctx, &reminder).await;

        let now = ctx.sys.get_timestamp_millis();
        ctx.repos
            .reminders
            .delete(&self.reminder_id, now)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use crate::scheduling::ReminderDispatcher;
    use remind_domain::{Channel, ContactMethod};
    use remind_infra::{setup_context_inmemory, InMemoryInfra};
    use std::sync::Arc;

    struct TestContext {
        infra: InMemoryInfra,
        user_id: ID,
        reminder: Reminder,
    }

    async fn setup(is_repeating: bool) -> TestContext {
        let infra = setup_context_inmemory();
        let user_id = ID::default();
        let now = infra.ctx.sys.get_timestamp_millis();
        let contact_method = ContactMethod {
            id: Default::default(),
            user_id: user_id.clone(),
            channel: Channel::Email("alice@example.com".into()),
            description: Default::default(),
            created: now,
            updated: now,
        };
        infra
            .ctx
            .repos
            .contact_methods
            .insert(&contact_method)
            .await
            .unwrap();

        let mut create = CreateReminderUseCase {
            user_id: user_id.clone(),
            contact_method_id: contact_method.id.clone(),
            body: "Take a break".into(),
            start_time: now + 60 * 60 * 1000,
            is_repeating,
            period_minutes: if is_repeating { 15 } else { 0 },
        };
        let reminder = create.execute(&infra.ctx).await.unwrap();

        TestContext {
            infra,
            user_id,
            reminder,
        }
    }

    #[tokio::test]
    async fn deletes_repeating_reminder_and_its_registration() {
        let test_ctx = setup(true).await;
        assert_eq!(test_ctx.infra.job_queue.recurring_registrations().len(), 1);

        let mut usecase = DeleteReminderUseCase {
            user_id: test_ctx.user_id.clone(),
            reminder_id: test_ctx.reminder.id.clone(),
        };
        let deleted = usecase.execute(&test_ctx.infra.ctx).await.unwrap();

        assert!(deleted.is_deleted());
        assert!(test_ctx.infra.job_queue.recurring_registrations().is_empty());
        assert!(test_ctx
            .infra
            .ctx
            .repos
            .reminders
            .find(&test_ctx.reminder.id)
            .await
            .is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn no_fires_after_delete() {
        let test_ctx = setup(true).await;
        let ctx = test_ctx.infra.ctx.clone();
        ctx.job_queue
            .set_worker(Arc::new(ReminderDispatcher::new(ctx.clone())));

        let mut usecase = DeleteReminderUseCase {
            user_id: test_ctx.user_id.clone(),
            reminder_id: test_ctx.reminder.id.clone(),
        };
        usecase.execute(&ctx).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_secs(4 * 60 * 60)).await;
        tokio::task::yield_now().await;
        assert!(test_ctx.infra.email_sender.sent().is_empty());
    }

    #[tokio::test]
    async fn deletes_one_time_reminder_and_cancels_its_job() {
        let test_ctx = setup(false).await;
        assert_eq!(test_ctx.infra.job_queue.pending_one_shot_count(), 1);

        let mut usecase = DeleteReminderUseCase {
            user_id: test_ctx.user_id.clone(),
            reminder_id: test_ctx.reminder.id.clone(),
        };
        usecase.execute(&test_ctx.infra.ctx).await.unwrap();

        assert_eq!(test_ctx.infra.job_queue.pending_one_shot_count(), 0);
    }

    #[tokio::test]
    async fn delete_succeeds_when_job_is_already_gone() {
        let test_ctx = setup(true).await;

        // The registry lost the job, for example across a restart with no
        // restore pass yet
        test_ctx.infra.job_queue.simulate_registry_loss();

        let mut usecase = DeleteReminderUseCase {
            user_id: test_ctx.user_id.clone(),
            reminder_id: test_ctx.reminder.id.clone(),
        };
        let deleted = usecase.execute(&test_ctx.infra.ctx).await.unwrap();
        assert!(deleted.is_deleted());
    }

    #[tokio::test]
    async fn rejects_unknown_reminder() {
        let test_ctx = setup(true).await;
        let mut usecase = DeleteReminderUseCase {
            user_id: test_ctx.user_id.clone(),
            reminder_id: ID::default(),
        };

        let res = usecase.execute(&test_ctx.infra.ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::NotFound(usecase.reminder_id.clone())
        );
    }

    #[tokio::test]
    async fn rejects_reminder_owned_by_other_user() {
        let test_ctx = setup(true).await;
        let mut usecase = DeleteReminderUseCase {
            user_id: ID::default(),
            reminder_id: test_ctx.reminder.id.clone(),
        };

        let res = usecase.execute(&test_ctx.infra.ctx).await;
        assert!(res.is_err());
        // The reminder and its registration are untouched
        assert!(test_ctx
            .infra
            .ctx
            .repos
            .reminders
            .find(&test_ctx.reminder.id)
            .await
            .is_some());
        assert_eq!(test_ctx.infra.job_queue.recurring_registrations().len(), 1);
    }
}
