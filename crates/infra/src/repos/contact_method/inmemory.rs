use super::IContactMethodRepo;
use crate::repos::shared::inmemory_repo::*;
use remind_domain::{ContactMethod, ID};

pub struct InMemoryContactMethodRepo {
    contact_methods: std::sync::Mutex<Vec<ContactMethod>>,
}

impl InMemoryContactMethodRepo {
    pub fn new() -> Self {
        Self {
            contact_methods: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IContactMethodRepo for InMemoryContactMethodRepo {
    async fn insert(&self, contact_method: &ContactMethod) -> anyhow::Result<()> {
        insert(contact_method, &self.contact_methods);
        Ok(())
    }

    async fn save(&self, contact_method: &ContactMethod) -> anyhow::Result<()> {
        save(contact_method, &self.contact_methods);
        Ok(())
    }

    async fn find(&self, contact_method_id: &ID) -> Option<ContactMethod> {
        find(contact_method_id, &self.contact_methods)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<ContactMethod> {
        find_by(&self.contact_methods, |c: &ContactMethod| {
            c.user_id == *user_id
        })
    }

    async fn delete(&self, contact_method_id: &ID) -> Option<ContactMethod> {
        delete(contact_method_id, &self.contact_methods)
    }
}
