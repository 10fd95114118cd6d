use super::IContactMethodRepo;
use remind_domain::{Channel, ContactMethod, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresContactMethodRepo {
    pool: PgPool,
}

impl PostgresContactMethodRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ContactMethodRaw {
    contact_method_uid: Uuid,
    user_uid: Uuid,
    channel_type: String,
    channel_value: String,
    description: String,
    created: i64,
    updated: i64,
}

impl ContactMethodRaw {
    /// Rows with a channel type outside the closed set are a data
    /// consistency bug and are surfaced as missing
    fn into_domain(self) -> Option<ContactMethod> {
        let channel = match self.channel_type.as_str() {
            "email" => Channel::Email(self.channel_value),
            "phone" => Channel::Phone(self.channel_value),
            unknown => {
                error!(
                    "Contact method {} has unknown channel type: {}",
                    self.contact_method_uid, unknown
                );
                return None;
            }
        };
        Some(ContactMethod {
            id: self.contact_method_uid.into(),
            user_id: self.user_uid.into(),
            channel,
            description: self.description,
            created: self.created,
            updated: self.updated,
        })
    }
}

#[async_trait::async_trait]
impl IContactMethodRepo for PostgresContactMethodRepo {
    async fn insert(&self, contact_method: &ContactMethod) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contact_methods
            (contact_method_uid, user_uid, channel_type, channel_value, description, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*contact_method.id.inner_ref())
        .bind(*contact_method.user_id.inner_ref())
        .bind(contact_method.channel.kind())
        .bind(contact_method.channel.address())
        .bind(&contact_method.description)
        .bind(contact_method.created)
        .bind(contact_method.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, contact_method: &ContactMethod) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE contact_methods SET
                channel_type = $2,
                channel_value = $3,
                description = $4,
                updated = $5
            WHERE contact_method_uid = $1
            "#,
        )
        .bind(*contact_method.id.inner_ref())
        .bind(contact_method.channel.kind())
        .bind(contact_method.channel.address())
        .bind(&contact_method.description)
        .bind(contact_method.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, contact_method_id: &ID) -> Option<ContactMethod> {
        let res: Option<ContactMethodRaw> = sqlx::query_as(
            r#"
            SELECT * FROM contact_methods
            WHERE contact_method_uid = $1
            "#,
        )
        .bind(*contact_method_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Find contact method {} failed: {:?}", contact_method_id, e);
            None
        });
        res.and_then(|c| c.into_domain())
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<ContactMethod> {
        let contact_methods: Vec<ContactMethodRaw> = sqlx::query_as(
            r#"
            SELECT * FROM contact_methods
            WHERE user_uid = $1
            ORDER BY created
            "#,
        )
        .bind(*user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Find contact methods for user {} failed: {:?}", user_id, e);
            vec![]
        });
        contact_methods
            .into_iter()
            .filter_map(|c| c.into_domain())
            .collect()
    }

    async fn delete(&self, contact_method_id: &ID) -> Option<ContactMethod> {
        let res: Option<ContactMethodRaw> = sqlx::query_as(
            r#"
            DELETE FROM contact_methods
            WHERE contact_method_uid = $1
            RETURNING *
            "#,
        )
        .bind(*contact_method_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Delete contact method {} failed: {:?}",
                contact_method_id, e
            );
            None
        });
        res.and_then(|c| c.into_domain())
    }
}
