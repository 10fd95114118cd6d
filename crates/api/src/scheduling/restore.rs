use remind_domain::{JobRef, ReminderJobArgs};
use remind_infra::RemindContext;
use tracing::{info, warn};

/// Startup reconciliation of recurring schedules. The job queue's
/// recurring registry lives in process memory, so after a restart the
/// store is the only source of truth for which recurring jobs should
/// exist. Re-registers every active repeating reminder and persists the
/// refreshed `JobRef`s.
///
/// Registration is deduplicated on the reminder id, so running this
/// again, or over reminders that are already registered, never creates
/// duplicate firers. One reminder failing is logged and skipped, it does
/// not abort the rest and never prevents startup.
pub async fn restore_recurring_reminders(ctx: &RemindContext) -> usize {
    let reminders = ctx.repos.reminders.find_active_recurring().await;
    let total = reminders.len();
    let mut restored = 0;

    for mut reminder in reminders {
        let args = ReminderJobArgs::new(reminder.id.clone());
        let handle = match ctx
            .job_queue
            .register_recurring(
                args.clone(),
                reminder.start_time,
                reminder.period_minutes,
                args.dedup_key(),
            )
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                warn!(
                    "Failed to re-register recurring reminder {}: {:?}",
                    reminder.id, e
                );
                continue;
            }
        };
        restored += 1;

        reminder.job_ref = Some(JobRef::Recurring(handle));
        reminder.updated = ctx.sys.get_timestamp_millis();
        if let Err(e) = ctx.repos.reminders.save(&reminder).await {
            // The registration is live, the stale ref is refreshed again
            // on the next restore pass
            warn!(
                "Failed to persist refreshed job ref for reminder {}: {:?}",
                reminder.id, e
            );
        }
    }

    info!("Restored {} of {} recurring reminders", restored, total);
    restored
}

#[cfg(test)]
mod test {
    use super::*;
    use remind_domain::{Channel, ContactMethod, Reminder, ID};
    use remind_infra::{setup_context_inmemory, InMemoryInfra};

    async fn insert_reminder(
        infra: &InMemoryInfra,
        user_id: &ID,
        contact_method_id: &ID,
        is_repeating: bool,
    ) -> Reminder {
        let ctx = &infra.ctx;
        let now = ctx.sys.get_timestamp_millis();
        let reminder = Reminder {
            id: Default::default(),
            user_id: user_id.clone(),
            contact_method_id: contact_method_id.clone(),
            body: "Water the plants".into(),
            start_time: now + 60_000,
            is_repeating,
            period_minutes: if is_repeating { 15 } else { 0 },
            job_ref: None,
            created: now,
            updated: now,
            deleted_at: None,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    async fn setup_with_reminders(recurring: usize, one_shot: usize) -> InMemoryInfra {
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

        for _ in 0..recurring {
            insert_reminder(&infra, &user_id, &contact_method.id, true).await;
        }
        for _ in 0..one_shot {
            insert_reminder(&infra, &user_id, &contact_method.id, false).await;
        }
        infra
    }

    #[tokio::test]
    async fn restores_recurring_reminders_after_registry_loss() {
        let infra = setup_with_reminders(3, 2).await;

        // Simulate the registry state right after a restart
        infra.job_queue.simulate_registry_loss();

        let restored = restore_recurring_reminders(&infra.ctx).await;
        assert_eq!(restored, 3);
        assert_eq!(infra.job_queue.recurring_registrations().len(), 3);

        // Every restored reminder carries a fresh recurring job ref
        for reminder in infra.ctx.repos.reminders.find_active_recurring().await {
            match reminder.job_ref {
                Some(JobRef::Recurring(_)) => {}
                other => panic!("Expected recurring job ref, got: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn restore_is_idempotent() {
        let infra = setup_with_reminders(3, 0).await;
        infra.job_queue.simulate_registry_loss();

        restore_recurring_reminders(&infra.ctx).await;
        let registrations = infra.job_queue.recurring_registrations();
        assert_eq!(registrations.len(), 3);

        // A second pass over the same reminders creates no duplicates
        restore_recurring_reminders(&infra.ctx).await;
        assert_eq!(infra.job_queue.recurring_registrations(), registrations);
    }

    #[tokio::test]
    async fn restore_skips_deleted_and_one_shot_reminders() {
        let infra = setup_with_reminders(2, 1).await;
        let extra = {
            let reminders = infra.ctx.repos.reminders.find_active_recurring().await;
            reminders[0].clone()
        };
        let now = infra.ctx.sys.get_timestamp_millis();
        infra
            .ctx
            .repos
            .reminders
            .delete(&extra.id, now)
            .await
            .unwrap();
        infra.job_queue.simulate_registry_loss();

        let restored = restore_recurring_reminders(&infra.ctx).await;
        assert_eq!(restored, 1);
        assert_eq!(infra.job_queue.recurring_registrations().len(), 1);
    }
}
