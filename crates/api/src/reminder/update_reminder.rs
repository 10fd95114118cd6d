use crate::error::RemindError;
use crate::scheduling::coordinator::{cancel_reminder_job, schedule_reminder};
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::update_reminder::*;
use remind_domain::{Reminder, ID};
use remind_infra::RemindContext;
use tracing::warn;

pub async fn update_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindContext>,
) -> Result<HttpResponse, RemindError> {
    let user_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = UpdateReminderUseCase {
        user_id,
        reminder_id: path_params.reminder_id.clone(),
        contact_method_id: body.contact_method_id,
        body: body.body,
        start_time: body.start_time,
        is_repeating: body.is_repeating.unwrap_or(false),
        period_minutes: body.period_minutes.unwrap_or(0),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(RemindError::from)
}

/// Fully replaces the reminder's schedule: the old job is canceled and a
/// new one registered, there is no in place adjustment of a cadence
/// already in flight.
#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    pub contact_method_id: ID,
    pub body: String,
    pub start_time: i64,
    pub is_repeating: bool,
    pub period_minutes: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidSchedule(i64),
    ContactMethodNotFound(ID),
    SchedulingFailure,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::InvalidSchedule(period_minutes) => Self::BadClientData(format!(
                "A repeating reminder must have a positive period, got: {}",
                period_minutes
            )),
            UseCaseError::ContactMethodNotFound(contact_method_id) => Self::NotFound(format!(
                "The contact method with id: {}, was not found.",
                contact_method_id
            )),
            UseCaseError::SchedulingFailure => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        // Cancel old job, register new job and persist the new JobRef must
        // not interleave with another update or delete of the same reminder
        let _guard = ctx.locks.acquire(&self.reminder_id).await;

        let reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

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

        cancel_reminder_job(ctx, &reminder).await;

        let original = reminder.clone();
        let mut reminder = reminder;
        reminder.contact_method_id = self.contact_method_id.clone();
        reminder.body = self.body.clone();
        reminder.start_time = self.start_time;
        reminder.is_repeating = self.is_repeating;
        reminder.period_minutes = self.period_minutes;
        reminder.job_ref = None;

        // The reminder itself must survive a failed reschedule, the row
        // keeps its old fields and gets its old schedule registered again
        if let Err(e) = schedule_reminder(ctx, &mut reminder).await {
            warn!(
                "Rescheduling reminder {} failed, restoring the previous schedule: {:?}",
                reminder.id, e
            );
            let mut previous = original;
            previous.job_ref = None;
            if let Err(e) = schedule_reminder(ctx, &mut previous).await {
                warn!(
                    "Restoring the previous schedule for reminder {} failed: {:?}",
                    previous.id, e
                );
            }
            return Err(UseCaseError::SchedulingFailure);
        }

        Ok(reminder)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use remind_domain::{Channel, ContactMethod, JobId, JobRef, RecurringHandle, ReminderJobArgs};
    use remind_infra::{setup_context_inmemory, IJobQueue, IJobWorker, InMemoryInfra};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FlakyQueue {
        inner: Arc<dyn IJobQueue>,
        registration_failures_left: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl IJobQueue for FlakyQueue {
        async fn schedule_once(&self, args: ReminderJobArgs, at: i64) -> anyhow::Result<JobId> {
            self.inner.schedule_once(args, at).await
        }

        async fn cancel_once(&self, job_id: &JobId) -> anyhow::Result<()> {
            self.inner.cancel_once(job_id).await
        }

        async fn register_recurring(
            &self,
            args: ReminderJobArgs,
            first_at: i64,
            interval_minutes: i64,
            dedup_key: String,
        ) -> anyhow::Result<RecurringHandle> {
            if self.registration_failures_left.load(Ordering::SeqCst) > 0 {
                self.registration_failures_left
                    .fetch_sub(1, Ordering::SeqCst);
                return Err(anyhow::anyhow!("Queue refused the registration"));
            }
            self.inner
                .register_recurring(args, first_at, interval_minutes, dedup_key)
                .await
        }

        async fn remove_recurring(&self, handle: RecurringHandle) -> anyhow::Result<()> {
            self.inner.remove_recurring(handle).await
        }

        fn set_worker(&self, worker: Arc<dyn IJobWorker>) {
            self.inner.set_worker(worker)
        }
    }

    struct TestContext {
        infra: InMemoryInfra,
        user_id: ID,
        contact_method: ContactMethod,
        reminder: Reminder,
    }

    async fn setup_with_repeating_reminder() -> TestContext {
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
            body: "Stretch".into(),
            start_time: now + 60 * 60 * 1000,
            is_repeating: true,
            period_minutes: 15,
        };
        let reminder = create.execute(&infra.ctx).await.unwrap();

        TestContext {
            infra,
            user_id,
            contact_method,
            reminder,
        }
    }

    fn update_usecase(test_ctx: &TestContext) -> UpdateReminderUseCase {
        UpdateReminderUseCase {
            user_id: test_ctx.user_id.clone(),
            reminder_id: test_ctx.reminder.id.clone(),
            contact_method_id: test_ctx.contact_method.id.clone(),
            body: test_ctx.reminder.body.clone(),
            start_time: test_ctx.reminder.start_time,
            is_repeating: true,
            period_minutes: 60,
        }
    }

    #[tokio::test]
    async fn replaces_recurring_schedule_with_new_interval() {
        let test_ctx = setup_with_repeating_reminder().await;
        let old_job_ref = test_ctx.reminder.job_ref.clone();

        let mut usecase = update_usecase(&test_ctx);
        let updated = usecase.execute(&test_ctx.infra.ctx).await.unwrap();

        assert_ne!(updated.job_ref, old_job_ref);
        let registrations = test_ctx.infra.job_queue.recurring_registrations();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].interval_minutes, 60);
        match updated.job_ref {
            Some(JobRef::Recurring(handle)) => assert_eq!(handle, registrations[0].handle),
            other => panic!("Expected recurring job ref, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn repeated_updates_never_accumulate_jobs() {
        let test_ctx = setup_with_repeating_reminder().await;

        for period_minutes in [30, 45, 60].iter() {
            let mut usecase = update_usecase(&test_ctx);
            usecase.period_minutes = *period_minutes;
            usecase.execute(&test_ctx.infra.ctx).await.unwrap();
        }

        assert_eq!(test_ctx.infra.job_queue.recurring_registrations().len(), 1);
        assert_eq!(test_ctx.infra.job_queue.pending_one_shot_count(), 0);
    }

    #[tokio::test]
    async fn switches_from_recurring_to_one_shot() {
        let test_ctx = setup_with_repeating_reminder().await;

        let mut usecase = update_usecase(&test_ctx);
        usecase.is_repeating = false;
        usecase.period_minutes = 0;
        let updated = usecase.execute(&test_ctx.infra.ctx).await.unwrap();

        match updated.job_ref {
            Some(JobRef::OneShot(_)) => {}
            other => panic!("Expected one shot job ref, got: {:?}", other),
        }
        assert!(test_ctx.infra.job_queue.recurring_registrations().is_empty());
        assert_eq!(test_ctx.infra.job_queue.pending_one_shot_count(), 1);
    }

    #[tokio::test]
    async fn failed_reschedule_keeps_reminder_and_restores_previous_schedule() {
        let test_ctx = setup_with_repeating_reminder().await;
        let mut ctx = test_ctx.infra.ctx.clone();
        ctx.job_queue = Arc::new(FlakyQueue {
            inner: ctx.job_queue.clone(),
            registration_failures_left: AtomicUsize::new(1),
        });

        let mut usecase = update_usecase(&test_ctx);
        let res = usecase.execute(&ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::SchedulingFailure);

        // The reminder survives with its old fields and a live job on the
        // old interval
        let reminder = ctx
            .repos
            .reminders
            .find(&test_ctx.reminder.id)
            .await
            .unwrap();
        assert_eq!(reminder.period_minutes, 15);
        assert!(matches!(reminder.job_ref, Some(JobRef::Recurring(_))));
        let registrations = test_ctx.infra.job_queue.recurring_registrations();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].interval_minutes, 15);
    }

    #[tokio::test]
    async fn rejects_unknown_reminder() {
        let test_ctx = setup_with_repeating_reminder().await;
        let mut usecase = update_usecase(&test_ctx);
        usecase.reminder_id = ID::default();

        let res = usecase.execute(&test_ctx.infra.ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::NotFound(usecase.reminder_id.clone())
        );
    }

    #[tokio::test]
    async fn rejects_reminder_owned_by_other_user() {
        let test_ctx = setup_with_repeating_reminder().await;
        let mut usecase = update_usecase(&test_ctx);
        usecase.user_id = ID::default();

        let res = usecase.execute(&test_ctx.infra.ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::NotFound(test_ctx.reminder.id.clone())
        );
    }

    #[tokio::test]
    async fn rejects_invalid_period_and_keeps_old_schedule() {
        let test_ctx = setup_with_repeating_reminder().await;
        let mut usecase = update_usecase(&test_ctx);
        usecase.period_minutes = 0;

        let res = usecase.execute(&test_ctx.infra.ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidSchedule(0));

        // The old registration is untouched
        let registrations = test_ctx.infra.job_queue.recurring_registrations();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].interval_minutes, 15);
    }
}
