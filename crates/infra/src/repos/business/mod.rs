mod inmemory;
mod postgres;

pub use inmemory::InMemoryBusinessRepo;
pub use postgres::PostgresBusinessRepo;

use abona_domain::{Business, ID};

#[async_trait::async_trait]
pub trait IBusinessRepo: Send + Sync {
    async fn insert(&self, business: &Business) -> anyhow::Result<()>;
    async fn save(&self, business: &Business) -> anyhow::Result<()>;
    async fn find(&self, business_id: &ID) -> Option<Business>;
    /// The primary business of an owner, i.e. the one provisioned at first
    /// contact
    async fn find_by_owner_id(&self, owner_id: &ID) -> Option<Business>;
    async fn list_by_owner_id(&self, owner_id: &ID) -> anyhow::Result<Vec<Business>>;
}

#[cfg(test)]
mod tests {
    use crate::AbonaContext;
    use abona_domain::Business;

    #[tokio::test]
    async fn insert_find_and_rename() {
        let ctx = AbonaContext::create_inmemory();
        let mut business = Business::new(Default::default(), "Yoga studio".into());

        assert!(ctx.repos.businesses.insert(&business).await.is_ok());
        let res = ctx.repos.businesses.find(&business.id).await.unwrap();
        assert_eq!(res.name, "Yoga studio");

        business.name = "Pilates studio".into();
        assert!(ctx.repos.businesses.save(&business).await.is_ok());
        let res = ctx.repos.businesses.find(&business.id).await.unwrap();
        assert_eq!(res.name, "Pilates studio");
    }

    #[tokio::test]
    async fn lookups_are_owner_scoped() {
        let ctx = AbonaContext::create_inmemory();
        let business = Business::new(Default::default(), "Studio".into());
        ctx.repos.businesses.insert(&business).await.unwrap();

        let res = ctx
            .repos
            .businesses
            .find_by_owner_id(&business.owner_id)
            .await
            .unwrap();
        assert_eq!(res.id, business.id);

        let other_owner = Default::default();
        assert!(ctx.repos.businesses.find_by_owner_id(&other_owner).await.is_none());
        let listed = ctx
            .repos
            .businesses
            .list_by_owner_id(&business.owner_id)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }
}
