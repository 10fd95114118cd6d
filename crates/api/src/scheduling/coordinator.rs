use remind_domain::{JobRef, Reminder, ReminderJobArgs};
use remind_infra::RemindContext;
use tracing::warn;

/// Registers a job for the reminder with the job queue and persists the
/// returned `JobRef` on the row. The job payload carries only the
/// reminder id, body and contact address are resolved at fire time.
///
/// Callers must have validated the schedule, and for an existing
/// reminder must hold its lock and have canceled the previous job.
pub async fn schedule_reminder(
    ctx: &RemindContext,
    reminder: &mut Reminder,
) -> anyhow::Result<()> {
    let args = ReminderJobArgs::new(reminder.id.clone());

    let job_ref = if reminder.is_repeating {
        let dedup_key = args.dedup_key();
        let handle = ctx
            .job_queue
            .register_recurring(args, reminder.start_time, reminder.period_minutes, dedup_key)
            .await?;
        JobRef::Recurring(handle)
    } else {
        let job_id = ctx.job_queue.schedule_once(args, reminder.start_time).await?;
        JobRef::OneShot(job_id)
    };

    reminder.job_ref = Some(job_ref);
    reminder.updated = ctx.sys.get_timestamp_millis();
    if let Err(e) = ctx.repos.reminders.save(reminder).await {
        // No row may lose track of a live firer, the registration goes
        // away with the failed persist
        cancel_reminder_job(ctx, reminder).await;
        reminder.job_ref = None;
        return Err(e);
    }
    Ok(())
}

/// Cancels the reminder's live job, if any. A job the queue no longer
/// knows about is success, not an error: the in process registry may
/// already have lost it across a restart.
pub async fn cancel_reminder_job(ctx: &RemindContext, reminder: &Reminder) {
    let res = match &reminder.job_ref {
        Some(JobRef::OneShot(job_id)) => ctx.job_queue.cancel_once(job_id).await,
        Some(JobRef::Recurring(handle)) => ctx.job_queue.remove_recurring(*handle).await,
        None => Ok(()),
    };
    if let Err(e) = res {
        warn!(
            "Canceling job {:?} for reminder {} failed: {:?}",
            reminder.job_ref, reminder.id, e
        );
    }
}
