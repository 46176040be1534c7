mod inmemory;
mod postgres;

pub use inmemory::InMemorySubscriptionRepo;
pub use postgres::PostgresSubscriptionRepo;

use abona_domain::{Subscription, ID};
use chrono::NaiveDate;

#[async_trait::async_trait]
pub trait ISubscriptionRepo: Send + Sync {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()>;
    async fn save(&self, subscription: &Subscription) -> anyhow::Result<()>;
    async fn find(&self, subscription_id: &ID) -> Option<Subscription>;
    async fn list_by_business_id(&self, business_id: &ID) -> anyhow::Result<Vec<Subscription>>;
    /// Active subscriptions under the business expiring within `days_until`
    /// days from `today`. With `require_not_yet_reminded` the query also
    /// filters out subscriptions whose current cycle was already reminded.
    async fn find_reminder_candidates(
        &self,
        business_id: &ID,
        today: NaiveDate,
        days_until: i64,
        require_not_yet_reminded: bool,
    ) -> anyhow::Result<Vec<Subscription>>;
    /// Conditional transition of `reminder_sent_at` from null to `sent_at`.
    /// This compare-and-set is the sole idempotency guard across scheduler
    /// instances. Returns true iff this call performed the transition.
    async fn claim_reminder_slot(&self, subscription_id: &ID, sent_at: i64) -> anyhow::Result<bool>;
    /// Rolls a claim back after a failed delivery. Only valid when called by
    /// the instance holding the claim.
    async fn release_reminder_slot(&self, subscription_id: &ID) -> anyhow::Result<()>;
}
