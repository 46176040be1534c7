use super::ISubscriptionRepo;
use crate::repos::shared::inmemory_repo::*;
use abona_domain::{Entity, Subscription, ID};
use chrono::NaiveDate;

pub struct InMemorySubscriptionRepo {
    subscriptions: std::sync::Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self {
            subscriptions: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ISubscriptionRepo for InMemorySubscriptionRepo {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()> {
        insert(subscription, &self.subscriptions);
        Ok(())
    }

    async fn save(&self, subscription: &Subscription) -> anyhow::Result<()> {
        save(subscription, &self.subscriptions);
        Ok(())
    }

    async fn find(&self, subscription_id: &ID) -> Option<Subscription> {
        find(subscription_id, &self.subscriptions)
    }

    async fn list_by_business_id(&self, business_id: &ID) -> anyhow::Result<Vec<Subscription>> {
        Ok(find_by(&self.subscriptions, |s| {
            s.business_id == *business_id
        }))
    }

    async fn find_reminder_candidates(
        &self,
        business_id: &ID,
        today: NaiveDate,
        days_until: i64,
        require_not_yet_reminded: bool,
    ) -> anyhow::Result<Vec<Subscription>> {
        Ok(find_by(&self.subscriptions, |s| {
            s.business_id == *business_id
                && s.is_reminder_candidate(today, days_until, require_not_yet_reminded)
        }))
    }

    async fn claim_reminder_slot(
        &self,
        subscription_id: &ID,
        sent_at: i64,
    ) -> anyhow::Result<bool> {
        // Read and write under the same lock, mirroring the conditional
        // update the real store performs
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions
            .iter_mut()
            .find(|s| s.id() == subscription_id && s.reminder_sent_at.is_none())
        {
            Some(subscription) => {
                subscription.reminder_sent_at = Some(sent_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn release_reminder_slot(&self, subscription_id: &ID) -> anyhow::Result<()> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        if let Some(subscription) = subscriptions.iter_mut().find(|s| s.id() == subscription_id) {
            subscription.reminder_sent_at = None;
        }
        Ok(())
    }
}
