use super::IOwnerRepo;
use crate::repos::shared::inmemory_repo::*;
use abona_domain::{OwnerProfile, ID};

pub struct InMemoryOwnerRepo {
    owners: std::sync::Mutex<Vec<OwnerProfile>>,
}

impl InMemoryOwnerRepo {
    pub fn new() -> Self {
        Self {
            owners: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IOwnerRepo for InMemoryOwnerRepo {
    async fn insert(&self, owner: &OwnerProfile) -> anyhow::Result<()> {
        insert(owner, &self.owners);
        Ok(())
    }

    async fn insert_if_absent(&self, owner: &OwnerProfile) -> anyhow::Result<bool> {
        // Check and insert under the same lock, mirroring the uniqueness
        // constraint the real store enforces
        let mut owners = self.owners.lock().unwrap();
        if owners
            .iter()
            .any(|o| o.external_user_id == owner.external_user_id)
        {
            return Ok(false);
        }
        owners.push(owner.clone());
        Ok(true)
    }

    async fn save(&self, owner: &OwnerProfile) -> anyhow::Result<()> {
        save(owner, &self.owners);
        Ok(())
    }

    async fn find(&self, owner_id: &ID) -> Option<OwnerProfile> {
        find(owner_id, &self.owners)
    }

    async fn find_by_external_id(&self, external_user_id: i64) -> Option<OwnerProfile> {
        let owners = find_by(&self.owners, |o| o.external_user_id == external_user_id);
        owners.into_iter().next()
    }

    async fn find_reminder_enabled(&self) -> anyhow::Result<Vec<OwnerProfile>> {
        Ok(find_by(&self.owners, |o| o.settings.enabled))
    }
}
