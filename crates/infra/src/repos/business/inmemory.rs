use super::IBusinessRepo;
use crate::repos::shared::inmemory_repo::*;
use abona_domain::{Business, ID};

pub struct InMemoryBusinessRepo {
    businesses: std::sync::Mutex<Vec<Business>>,
}

impl InMemoryBusinessRepo {
    pub fn new() -> Self {
        Self {
            businesses: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IBusinessRepo for InMemoryBusinessRepo {
    async fn insert(&self, business: &Business) -> anyhow::Result<()> {
        insert(business, &self.businesses);
        Ok(())
    }

    async fn save(&self, business: &Business) -> anyhow::Result<()> {
        save(business, &self.businesses);
        Ok(())
    }

    async fn find(&self, business_id: &ID) -> Option<Business> {
        find(business_id, &self.businesses)
    }

    async fn find_by_owner_id(&self, owner_id: &ID) -> Option<Business> {
        let businesses = find_by(&self.businesses, |b| b.owner_id == *owner_id);
        businesses.into_iter().next()
    }

    async fn list_by_owner_id(&self, owner_id: &ID) -> anyhow::Result<Vec<Business>> {
        Ok(find_by(&self.businesses, |b| b.owner_id == *owner_id))
    }
}
