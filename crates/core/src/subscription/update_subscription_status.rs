use crate::shared::usecase::UseCase;
use abona_domain::{Subscription, TransitionError, ID};
use abona_infra::AbonaContext;

#[derive(Debug, Clone, Copy)]
pub enum StatusAction {
    Cancel,
    Freeze,
    Resume,
}

/// Drives the explicit status transitions. Expiration is not one of them,
/// it is derived from the end date when a subscription is read.
#[derive(Debug)]
pub struct UpdateSubscriptionStatusUseCase {
    pub subscription_id: ID,
    pub action: StatusAction,
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
impl UseCase for UpdateSubscriptionStatusUseCase {
    type Response = Subscription;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateSubscriptionStatus";

    async fn execute(&mut self, ctx: &AbonaContext) -> Result<Self::Response, Self::Error> {
        let mut subscription = ctx
            .repos
            .subscriptions
            .find(&self.subscription_id)
            .await
            .ok_or_else(|| UseCaseError::SubscriptionNotFound(self.subscription_id.clone()))?;

        match self.action {
            StatusAction::Cancel => subscription.cancel()?,
            StatusAction::Freeze => subscription.freeze()?,
            StatusAction::Resume => subscription.resume()?,
        }

        ctx.repos.subscriptions.save(&subscription).await?;
        Ok(subscription)
    }
}
