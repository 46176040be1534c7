use crate::reminder::message::expiring_subscription_text;
use crate::shared::usecase::UseCase;
use abona_infra::AbonaContext;
use tracing::warn;

/// Owner-triggered reminder run for one business.
///
/// Unlike the scheduled sweep this path neither claims subscriptions nor
/// respects the already-reminded flag: the owner explicitly asked for the
/// current picture, so repeating a reminder is fine. Delivery here is at
/// least once and `reminder_sent_at` is never touched.
#[derive(Debug)]
pub struct SendBusinessRemindersUseCase {
    pub business_id: abona_domain::ID,
    pub days_until: i64,
}

#[derive(Debug, PartialEq)]
pub struct UseCaseRes {
    pub candidates: usize,
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("Business with id: {0} was not found")]
    BusinessNotFound(abona_domain::ID),
    #[error("Owner of business: {0} was not found")]
    OwnerNotFound(abona_domain::ID),
    #[error(transparent)]
    StorageError(#[from] anyhow::Error),
}

#[async_trait::async_trait]
impl UseCase for SendBusinessRemindersUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "SendBusinessReminders";

    async fn execute(&mut self, ctx: &AbonaContext) -> Result<Self::Response, Self::Error> {
        let business = ctx
            .repos
            .businesses
            .find(&self.business_id)
            .await
            .ok_or_else(|| UseCaseError::BusinessNotFound(self.business_id.clone()))?;
        let owner = ctx
            .repos
            .owners
            .find(&business.owner_id)
            .await
            .ok_or_else(|| UseCaseError::OwnerNotFound(self.business_id.clone()))?;

        let today = ctx
            .sys
            .get_utc_datetime()
            .with_timezone(&owner.settings.timezone)
            .date_naive();

        let candidates = ctx
            .repos
            .subscriptions
            .find_reminder_candidates(&business.id, today, self.days_until, false)
            .await?;

        let mut res = UseCaseRes {
            candidates: candidates.len(),
            sent: 0,
            failed: 0,
        };
        for subscription in candidates {
            let client_name = match ctx.repos.clients.find(&subscription.client_id).await {
                Some(client) => client.full_name,
                None => "Unknown".to_string(),
            };
            let text = expiring_subscription_text(&client_name, &subscription, today);
            match ctx
                .notification_gateway
                .send(owner.external_user_id, &text)
                .await
            {
                Ok(_) => res.sent += 1,
                Err(e) => {
                    warn!(
                        "Manual reminder for subscription: {} failed. Error: {:?}",
                        subscription.id, e
                    );
                    res.failed += 1;
                }
            }
        }
        Ok(res)
    }
}
