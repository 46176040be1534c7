use crate::shared::usecase::UseCase;
use abona_domain::{Subscription, ID};
use abona_infra::AbonaContext;
use chrono::NaiveDate;

#[derive(Debug)]
pub struct CreateSubscriptionUseCase {
    pub business_id: ID,
    pub client_id: ID,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("Business with id: {0} was not found")]
    BusinessNotFound(ID),
    #[error("Client with id: {0} was not found in this business")]
    ClientNotFound(ID),
    #[error("End date must not precede start date")]
    InvalidPeriod,
    #[error(transparent)]
    StorageError(#[from] anyhow::Error),
}

#[async_trait::async_trait]
impl UseCase for CreateSubscriptionUseCase {
    type Response = Subscription;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateSubscription";

    async fn execute(&mut self, ctx: &AbonaContext) -> Result<Self::Response, Self::Error> {
        if self.end_date < self.start_date {
            return Err(UseCaseError::InvalidPeriod);
        }

        let business = ctx
            .repos
            .businesses
            .find(&self.business_id)
            .await
            .ok_or_else(|| UseCaseError::BusinessNotFound(self.business_id.clone()))?;

        // The client must belong to the same business the subscription is
        // created under
        let client = ctx
            .repos
            .clients
            .find(&self.client_id)
            .await
            .filter(|c| c.business_id == business.id)
            .ok_or_else(|| UseCaseError::ClientNotFound(self.client_id.clone()))?;

        let subscription = Subscription::new(business.id, client.id, self.start_date, self.end_date);
        ctx.repos.subscriptions.insert(&subscription).await?;
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use abona_domain::{Business, Client, SubscriptionStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed(ctx: &AbonaContext) -> (Business, Client) {
        let business = Business::new(Default::default(), "Studio".into());
        ctx.repos.businesses.insert(&business).await.unwrap();
        let client = Client::new(business.id.clone(), "Ivan".into(), "+79150000000".into());
        ctx.repos.clients.insert(&client).await.unwrap();
        (business, client)
    }

    #[tokio::test]
    async fn creates_active_subscription() {
        let ctx = AbonaContext::create_inmemory();
        let (business, client) = seed(&ctx).await;

        let res = execute(
            CreateSubscriptionUseCase {
                business_id: business.id,
                client_id: client.id,
                start_date: date(2026, 8, 1),
                end_date: date(2026, 8, 31),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(res.status, SubscriptionStatus::Active);
        assert_eq!(res.reminder_sent_at, None);
    }

    #[tokio::test]
    async fn rejects_client_from_another_business() {
        let ctx = AbonaContext::create_inmemory();
        let (business, _) = seed(&ctx).await;
        let foreign_client = Client::new(Default::default(), "Oleg".into(), "+79160000000".into());
        ctx.repos.clients.insert(&foreign_client).await.unwrap();

        let res = execute(
            CreateSubscriptionUseCase {
                business_id: business.id,
                client_id: foreign_client.id,
                start_date: date(2026, 8, 1),
                end_date: date(2026, 8, 31),
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn rejects_inverted_period() {
        let ctx = AbonaContext::create_inmemory();
        let (business, client) = seed(&ctx).await;

        let res = execute(
            CreateSubscriptionUseCase {
                business_id: business.id,
                client_id: client.id,
                start_date: date(2026, 8, 31),
                end_date: date(2026, 8, 1),
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::InvalidPeriod)));
    }
}
