use remind_domain::{Channel, ReminderJobArgs};
use remind_infra::{IJobWorker, JobError, RemindContext};
use tracing::info;

const REMINDER_SUBJECT: &str = "Reminder";

/// The worker invoked by the job queue when a reminder job fires, for
/// both one shot and recurring jobs. Resolves the reminder and its
/// contact method at fire time so that edits made after scheduling are
/// honored.
pub struct ReminderDispatcher {
    ctx: RemindContext,
}

impl ReminderDispatcher {
    pub fn new(ctx: RemindContext) -> Self {
        Self { ctx }
    }
}

#[async_trait::async_trait]
impl IJobWorker for ReminderDispatcher {
    async fn run(&self, args: &ReminderJobArgs) -> Result<(), JobError> {
        let ctx = &self.ctx;

        // A reminder deleted after its job was scheduled is gone for good,
        // retrying cannot bring it back
        let reminder = ctx
            .repos
            .reminders
            .find(&args.reminder_id)
            .await
            .ok_or_else(|| {
                JobError::Permanent(format!("Reminder {} no longer exists", args.reminder_id))
            })?;

        let contact_method = ctx
            .repos
            .contact_methods
            .find(&reminder.contact_method_id)
            .await
            .ok_or_else(|| {
                JobError::Permanent(format!(
                    "Contact method {} referenced by reminder {} no longer exists",
                    reminder.contact_method_id, reminder.id
                ))
            })?;

        let sender = match &contact_method.channel {
            Channel::Email(_) => &ctx.senders.email,
            Channel::Phone(_) => &ctx.senders.sms,
        };

        sender
            .send(
                contact_method.channel.address(),
                REMINDER_SUBJECT,
                &reminder.body,
            )
            .await
            .map_err(|e| JobError::Transient(format!("{:?}", e)))?;

        info!(
            "Dispatched reminder {} over {} to {}",
            reminder.id,
            contact_method.channel.kind(),
            contact_method.channel.address()
        );
        Ok(())
    }
}
