mod inmemory;
mod postgres;

pub use inmemory::InMemoryClientRepo;
pub use postgres::PostgresClientRepo;

use abona_domain::{Client, ID};

#[async_trait::async_trait]
pub trait IClientRepo: Send + Sync {
    async fn insert(&self, client: &Client) -> anyhow::Result<()>;
    async fn find(&self, client_id: &ID) -> Option<Client>;
    async fn list_by_business_id(&self, business_id: &ID) -> anyhow::Result<Vec<Client>>;
}

#[cfg(test)]
mod tests {
    use crate::AbonaContext;
    use abona_domain::Client;

    #[tokio::test]
    async fn insert_and_list_is_business_scoped() {
        let ctx = AbonaContext::create_inmemory();
        let client = Client::new(Default::default(), "Ivan".into(), "+79150000000".into());
        ctx.repos.clients.insert(&client).await.unwrap();

        let res = ctx.repos.clients.find(&client.id).await.unwrap();
        assert_eq!(res.full_name, "Ivan");

        let listed = ctx
            .repos
            .clients
            .list_by_business_id(&client.business_id)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);

        let other_business = Default::default();
        let listed = ctx
            .repos
            .clients
            .list_by_business_id(&other_business)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
