mod job_queue;
mod notifier;

pub use job_queue::{
    IJobQueue, IJobWorker, JobError, RecurringRegistration, TokioJobQueue,
};
pub use notifier::{
    HttpRelaySender, INotificationSender, InMemorySender, NoopSender, NotificationSenders,
    SentMessage,
};
