mod inmemory;
mod postgres;

pub use inmemory::InMemoryOwnerRepo;
pub use postgres::PostgresOwnerRepo;

use abona_domain::{OwnerProfile, ID};

#[async_trait::async_trait]
pub trait IOwnerRepo: Send + Sync {
    async fn insert(&self, owner: &OwnerProfile) -> anyhow::Result<()>;
    /// Insert the owner unless a profile for the same external user id
    /// already exists. The check and insert happen atomically at the store
    /// level, so concurrent first contacts cannot both win. Returns true
    /// iff this call performed the insert.
    async fn insert_if_absent(&self, owner: &OwnerProfile) -> anyhow::Result<bool>;
    async fn save(&self, owner: &OwnerProfile) -> anyhow::Result<()>;
    async fn find(&self, owner_id: &ID) -> Option<OwnerProfile>;
    async fn find_by_external_id(&self, external_user_id: i64) -> Option<OwnerProfile>;
    async fn find_reminder_enabled(&self) -> anyhow::Result<Vec<OwnerProfile>>;
}
