use remind_domain::ID;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per reminder async locks. Update and delete must not interleave their
/// cancel old job / register new job / persist JobRef sequence for the
/// same reminder id, different reminders are independent.
#[derive(Clone, Default)]
pub struct ReminderLocks {
    locks: Arc<Mutex<HashMap<ID, Arc<AsyncMutex<()>>>>>,
}

impl ReminderLocks {
    pub fn new() -> Self {
        Default::default()
    }

    pub async fn acquire(&self, reminder_id: &ID) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap();
            // A count of one means only the map still holds the lock, no
            // guard and no waiter is alive for it anymore
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(reminder_id.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn serializes_same_id_only() {
        let locks = ReminderLocks::new();
        let id = ID::default();
        let other = ID::default();

        let guard = locks.acquire(&id).await;
        // Different id is not blocked
        let _other_guard = locks.acquire(&other).await;

        let locks_clone = locks.clone();
        let id_clone = id.clone();
        let contender = tokio::spawn(async move {
            let _guard = locks_clone.acquire(&id_clone).await;
        });
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn evicts_locks_nobody_holds() {
        let locks = ReminderLocks::new();

        let guard = locks.acquire(&ID::default()).await;
        drop(guard);

        // The next acquire sweeps the released entry
        let _guard = locks.acquire(&ID::default()).await;
        assert_eq!(locks.locks.lock().unwrap().len(), 1);
    }
}
