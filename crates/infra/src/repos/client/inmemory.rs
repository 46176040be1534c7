use super::IClientRepo;
use crate::repos::shared::inmemory_repo::*;
use abona_domain::{Client, ID};

pub struct InMemoryClientRepo {
    clients: std::sync::Mutex<Vec<Client>>,
}

impl InMemoryClientRepo {
    pub fn new() -> Self {
        Self {
            clients: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IClientRepo for InMemoryClientRepo {
    async fn insert(&self, client: &Client) -> anyhow::Result<()> {
        insert(client, &self.clients);
        Ok(())
    }

    async fn find(&self, client_id: &ID) -> Option<Client> {
        find(client_id, &self.clients)
    }

    async fn list_by_business_id(&self, business_id: &ID) -> anyhow::Result<Vec<Client>> {
        Ok(find_by(&self.clients, |c| c.business_id == *business_id))
    }
}
