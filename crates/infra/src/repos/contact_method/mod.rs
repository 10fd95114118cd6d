mod inmemory;
mod postgres;

pub use inmemory::InMemoryContactMethodRepo;
pub use postgres::PostgresContactMethodRepo;
use remind_domain::{ContactMethod, ID};

#[async_trait::async_trait]
pub trait IContactMethodRepo: Send + Sync {
    async fn insert(&self, contact_method: &ContactMethod) -> anyhow::Result<()>;
    async fn save(&self, contact_method: &ContactMethod) -> anyhow::Result<()>;
    async fn find(&self, contact_method_id: &ID) -> Option<ContactMethod>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<ContactMethod>;
    async fn delete(&self, contact_method_id: &ID) -> Option<ContactMethod>;
}
