use super::IReminderRepo;
use remind_domain::{JobRef, Reminder, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    user_uid: Uuid,
    contact_method_uid: Uuid,
    body: String,
    start_time: i64,
    is_repeating: bool,
    period_minutes: i64,
    job_ref: Option<Json<JobRef>>,
    created: i64,
    updated: i64,
    deleted_at: Option<i64>,
}

impl Into<Reminder> for ReminderRaw {
    fn into(self) -> Reminder {
        Reminder {
            id: self.reminder_uid.into(),
            user_id: self.user_uid.into(),
            contact_method_id: self.contact_method_uid.into(),
            body: self.body,
            start_time: self.start_time,
            is_repeating: self.is_repeating,
            period_minutes: self.period_minutes,
            job_ref: self.job_ref.map(|job_ref| job_ref.0),
            created: self.created,
            updated: self.updated,
            deleted_at: self.deleted_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, user_uid, contact_method_uid, body, start_time, is_repeating, period_minutes, job_ref, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(*reminder.id.inner_ref())
        .bind(*reminder.user_id.inner_ref())
        .bind(*reminder.contact_method_id.inner_ref())
        .bind(&reminder.body)
        .bind(reminder.start_time)
        .bind(reminder.is_repeating)
        .bind(reminder.period_minutes)
        .bind(reminder.job_ref.clone().map(Json))
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders SET
                contact_method_uid = $2,
                body = $3,
                start_time = $4,
                is_repeating = $5,
                period_minutes = $6,
                job_ref = $7,
                updated = $8,
                deleted_at = $9
            WHERE reminder_uid = $1
            "#,
        )
        .bind(*reminder.id.inner_ref())
        .bind(*reminder.contact_method_id.inner_ref())
        .bind(&reminder.body)
        .bind(reminder.start_time)
        .bind(reminder.is_repeating)
        .bind(reminder.period_minutes)
        .bind(reminder.job_ref.clone().map(Json))
        .bind(reminder.updated)
        .bind(reminder.deleted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE reminder_uid = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Find reminder {} failed: {:?}", reminder_id, e);
            None
        });
        res.map(|reminder| reminder.into())
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE user_uid = $1 AND deleted_at IS NULL
            ORDER BY start_time
            "#,
        )
        .bind(*user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Find reminders for user {} failed: {:?}", user_id, e);
            vec![]
        });
        reminders.into_iter().map(|r| r.into()).collect()
    }

    async fn find_active_recurring(&self) -> Vec<Reminder> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE is_repeating AND period_minutes > 0 AND deleted_at IS NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Find active recurring reminders failed: {:?}", e);
            vec![]
        });
        reminders.into_iter().map(|r| r.into()).collect()
    }

    async fn delete(&self, reminder_id: &ID, deleted_at: i64) -> Option<Reminder> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            UPDATE reminders SET deleted_at = $2
            WHERE reminder_uid = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .bind(deleted_at)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Delete reminder {} failed: {:?}", reminder_id, e);
            None
        });
        res.map(|reminder| reminder.into())
    }
}
