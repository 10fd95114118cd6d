mod config;
mod locks;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use locks::ReminderLocks;
pub use repos::{IContactMethodRepo, IReminderRepo, Repos};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct RemindContext {
    pub repos: Repos,
    pub config: Config,
    pub job_queue: Arc<dyn IJobQueue>,
    pub senders: NotificationSenders,
    pub locks: ReminderLocks,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl RemindContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});
        Self {
            repos,
            senders: create_senders(&config),
            config,
            job_queue: Arc::new(TokioJobQueue::new(sys.clone())),
            locks: ReminderLocks::new(),
            sys,
        }
    }
}

fn create_senders(config: &Config) -> NotificationSenders {
    let email: Arc<dyn INotificationSender> = match &config.email_relay_url {
        Some(url) => Arc::new(HttpRelaySender::new(
            "email",
            url.clone(),
            config.relay_key.clone(),
        )),
        None => Arc::new(NoopSender::new("email")),
    };
    let sms: Arc<dyn INotificationSender> = match &config.sms_relay_url {
        Some(url) => Arc::new(HttpRelaySender::new(
            "sms",
            url.clone(),
            config.relay_key.clone(),
        )),
        None => Arc::new(NoopSender::new("sms")),
    };
    NotificationSenders { email, sms }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> RemindContext {
    RemindContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

/// Infrastructure wired fully in memory, with concrete handles for the
/// pieces tests need to inspect or manipulate
pub struct InMemoryInfra {
    pub ctx: RemindContext,
    pub job_queue: Arc<TokioJobQueue>,
    pub email_sender: Arc<InMemorySender>,
    pub sms_sender: Arc<InMemorySender>,
}

pub fn setup_context_inmemory() -> InMemoryInfra {
    let sys: Arc<dyn ISys> = Arc::new(RealSys {});
    let job_queue = Arc::new(TokioJobQueue::new(sys.clone()));
    let email_sender = Arc::new(InMemorySender::new());
    let sms_sender = Arc::new(InMemorySender::new());
    let ctx = RemindContext {
        repos: Repos::create_inmemory(),
        config: Config::new(),
        job_queue: job_queue.clone(),
        senders: NotificationSenders {
            email: email_sender.clone(),
            sms: sms_sender.clone(),
        },
        locks: ReminderLocks::new(),
        sys,
    };
    InMemoryInfra {
        ctx,
        job_queue,
        email_sender,
        sms_sender,
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
