mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IBusinessRepo, IClientRepo, IOwnerRepo, ISubscriptionRepo, Repos};
pub use services::{
    INotificationGateway, InMemoryNotificationGateway, TelegramNotificationGateway,
};
pub use system::{ISys, RealSys};

use std::sync::Arc;

#[derive(Clone)]
pub struct AbonaContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notification_gateway: Arc<dyn INotificationGateway>,
}

struct ContextParams {
    pub postgres_connection_string: String,
    pub telegram_bot_token: String,
}

impl AbonaContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        Ok(Self {
            repos,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notification_gateway: Arc::new(TelegramNotificationGateway::new(
                &params.telegram_bot_token,
            )),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notification_gateway: Arc::new(InMemoryNotificationGateway::new()),
        }
    }
}

/// Assembles the production context from the environment. Missing
/// connection details are unrecoverable at startup so this panics.
pub async fn setup_context() -> AbonaContext {
    let connection_string = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL env var to be present and valid");
    let config = Config::new();
    let telegram_bot_token = config
        .telegram_bot_token
        .clone()
        .expect("TELEGRAM_BOT_TOKEN env var to be present and valid");
    AbonaContext::create(ContextParams {
        postgres_connection_string: connection_string,
        telegram_bot_token,
    })
    .await
    .expect("Postgres connection and migrations to succeed")
}
