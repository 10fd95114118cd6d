mod contact_method;
mod reminder;
mod shared;

use contact_method::{InMemoryContactMethodRepo, PostgresContactMethodRepo};
use reminder::{InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

pub use contact_method::IContactMethodRepo;
pub use reminder::IReminderRepo;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub contact_methods: Arc<dyn IContactMethodRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            contact_methods: Arc::new(PostgresContactMethodRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            contact_methods: Arc::new(InMemoryContactMethodRepo::new()),
        }
    }
}
