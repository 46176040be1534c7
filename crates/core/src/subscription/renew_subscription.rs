use crate::shared::usecase::UseCase;
use abona_domain::{Subscription, TransitionError, ID};
use abona_infra::AbonaContext;

/// Extends a subscription and re-arms its reminder cycle. The cleared
/// `reminder_sent_at` makes the subscription eligible for a fresh reminder
/// when the new end date enters the reminder window.
#[derive(Debug)]
pub struct RenewSubscriptionUseCase {
    pub subscription_id: ID,
    pub additional_days: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("Subscription with id: {0} was not found")]
    SubscriptionNotFound(ID),
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error(transparent)]
    StorageError(#[from] anyhow::Error),
}

#[async_trait::async_trait]
impl UseCase for RenewSubscriptionUseCase {
    type Response = Subscription;
    type Error = UseCaseError;

    const NAME: &'static str = "RenewSubscription";

    async fn execute(&mut self, ctx: &AbonaContext) -> Result<Self::Response, Self::Error> {
        let mut subscription = ctx
            .repos
            .subscriptions
            .find(&self.subscription_id)
            .await
            .ok_or_else(|| UseCaseError::SubscriptionNotFound(self.subscription_id.clone()))?;

        subscription.renew(self.additional_days)?;
        ctx.repos.subscriptions.save(&subscription).await?;
        Ok(subscription)
    }
}
