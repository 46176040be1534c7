use crate::shared::usecase::UseCase;
use abona_domain::{normalize_phone, Client, ID};
use abona_infra::AbonaContext;

#[derive(Debug)]
pub struct CreateClientUseCase {
    pub business_id: ID,
    pub full_name: String,
    pub phone: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("Business with id: {0} was not found")]
    BusinessNotFound(ID),
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),
    #[error(transparent)]
    StorageError(#[from] anyhow::Error),
}

#[async_trait::async_trait]
impl UseCase for CreateClientUseCase {
    type Response = Client;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateClient";

    async fn execute(&mut self, ctx: &AbonaContext) -> Result<Self::Response, Self::Error> {
        let business = ctx
            .repos
            .businesses
            .find(&self.business_id)
            .await
            .ok_or_else(|| UseCaseError::BusinessNotFound(self.business_id.clone()))?;

        let phone = normalize_phone(&self.phone)
            .ok_or_else(|| UseCaseError::InvalidPhone(self.phone.clone()))?;

        let client = Client::new(business.id, self.full_name.clone(), phone);
        ctx.repos.clients.insert(&client).await?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use abona_domain::Business;

    #[tokio::test]
    async fn creates_client_with_normalized_phone() {
        let ctx = AbonaContext::create_inmemory();
        let business = Business::new(Default::default(), "Studio".into());
        ctx.repos.businesses.insert(&business).await.unwrap();

        let res = execute(
            CreateClientUseCase {
                business_id: business.id.clone(),
                full_name: "Ivan Petrov".into(),
                phone: "+7 915 000-00-00".into(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(res.phone, "+79150000000");
        assert_eq!(res.business_id, business.id);
    }

    #[tokio::test]
    async fn rejects_invalid_phone() {
        let ctx = AbonaContext::create_inmemory();
        let business = Business::new(Default::default(), "Studio".into());
        ctx.repos.businesses.insert(&business).await.unwrap();

        let res = execute(
            CreateClientUseCase {
                business_id: business.id,
                full_name: "Ivan".into(),
                phone: "not-a-number".into(),
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::InvalidPhone(_))));
    }

    #[tokio::test]
    async fn rejects_unknown_business() {
        let ctx = AbonaContext::create_inmemory();
        let res = execute(
            CreateClientUseCase {
                business_id: Default::default(),
                full_name: "Ivan".into(),
                phone: "+79150000000".into(),
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::BusinessNotFound(_))));
    }
}
