mod business;
mod client;
mod owner;
mod shared;
mod subscription;

pub use business::IBusinessRepo;
pub use client::IClientRepo;
pub use owner::IOwnerRepo;
pub use subscription::ISubscriptionRepo;

use business::{InMemoryBusinessRepo, PostgresBusinessRepo};
use client::{InMemoryClientRepo, PostgresClientRepo};
use owner::{InMemoryOwnerRepo, PostgresOwnerRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use subscription::{InMemorySubscriptionRepo, PostgresSubscriptionRepo};

#[derive(Clone)]
pub struct Repos {
    pub owners: Arc<dyn IOwnerRepo>,
    pub businesses: Arc<dyn IBusinessRepo>,
    pub clients: Arc<dyn IClientRepo>,
    pub subscriptions: Arc<dyn ISubscriptionRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(connection_string)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self {
            owners: Arc::new(PostgresOwnerRepo::new(pool.clone())),
            businesses: Arc::new(PostgresBusinessRepo::new(pool.clone())),
            clients: Arc::new(PostgresClientRepo::new(pool.clone())),
            subscriptions: Arc::new(PostgresSubscriptionRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            owners: Arc::new(InMemoryOwnerRepo::new()),
            businesses: Arc::new(InMemoryBusinessRepo::new()),
            clients: Arc::new(InMemoryClientRepo::new()),
            subscriptions: Arc::new(InMemorySubscriptionRepo::new()),
        }
    }
}
