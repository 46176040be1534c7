use crate::shared::usecase::UseCase;
use abona_domain::{Business, OwnerProfile};
use abona_infra::AbonaContext;
use tracing::info;

// A racer that loses the provisioning insert may observe the winner's
// business a moment later. Bounded re-reads cover that gap.
const RE_READ_ATTEMPTS: usize = 5;
const RE_READ_BACKOFF_MILLIS: u64 = 20;

/// Looks up the tenant pair (owner profile and primary business) for an
/// incoming external user, provisioning both on first contact.
#[derive(Debug)]
pub struct ResolveOwnerContextUseCase {
    pub external_user_id: i64,
    pub full_name: Option<String>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub owner: OwnerProfile,
    pub business: Business,
    /// True when this execution created the profile rather than finding it
    pub provisioned: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("No business could be resolved for external user: {0}")]
    BusinessNotFound(i64),
    #[error(transparent)]
    StorageError(#[from] anyhow::Error),
}

#[async_trait::async_trait]
impl UseCase for ResolveOwnerContextUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "ResolveOwnerContext";

    async fn execute(&mut self, ctx: &AbonaContext) -> Result<Self::Response, Self::Error> {
        if let Some(owner) = ctx
            .repos
            .owners
            .find_by_external_id(self.external_user_id)
            .await
        {
            let business = self.find_business(&owner, ctx).await?;
            return Ok(UseCaseRes {
                owner,
                business,
                provisioned: false,
            });
        }

        let owner = OwnerProfile::new(self.external_user_id, self.full_name.clone());
        if ctx.repos.owners.insert_if_absent(&owner).await? {
            let name = self
                .full_name
                .clone()
                .unwrap_or_else(|| format!("Business {}", self.external_user_id));
            let business = Business::new(owner.id.clone(), name);
            ctx.repos.businesses.insert(&business).await?;
            info!(
                "Provisioned owner: {} and business: {} for external user: {}",
                owner.id, business.id, self.external_user_id
            );
            return Ok(UseCaseRes {
                owner,
                business,
                provisioned: true,
            });
        }

        // Lost the first-contact race. The winner's inserts are in flight
        // or already visible, so read its rows instead.
        let owner = ctx
            .repos
            .owners
            .find_by_external_id(self.external_user_id)
            .await
            .ok_or(UseCaseError::BusinessNotFound(self.external_user_id))?;
        let business = self.find_business(&owner, ctx).await?;
        Ok(UseCaseRes {
            owner,
            business,
            provisioned: false,
        })
    }
}

impl ResolveOwnerContextUseCase {
    async fn find_business(
        &self,
        owner: &OwnerProfile,
        ctx: &AbonaContext,
    ) -> Result<Business, UseCaseError> {
        for attempt in 0..RE_READ_ATTEMPTS {
            if let Some(business) = ctx.repos.businesses.find_by_owner_id(&owner.id).await {
                return Ok(business);
            }
            if attempt + 1 < RE_READ_ATTEMPTS {
                tokio::time::sleep(std::time::Duration::from_millis(RE_READ_BACKOFF_MILLIS)).await;
            }
        }
        Err(UseCaseError::BusinessNotFound(self.external_user_id))
    }
}
