use crate::shared::usecase::UseCase;
use abona_domain::{OwnerProfile, ID};
use abona_infra::AbonaContext;

/// Applies a partial update to an owner's reminder preferences. Every
/// provided field is validated before anything is persisted, so a rejected
/// update leaves the stored settings untouched.
#[derive(Debug)]
pub struct UpdateReminderSettingsUseCase {
    pub owner_id: ID,
    pub enabled: Option<bool>,
    pub hour: Option<u32>,
    pub days_before: Option<i64>,
    pub timezone: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("Owner with id: {0} was not found")]
    OwnerNotFound(ID),
    #[error("No settings fields were provided")]
    NothingToUpdate,
    #[error("Invalid reminder hour: {0}, expected a value in [0, 23]")]
    InvalidHour(u32),
    #[error("Invalid days before expiry: {0}, expected a value in [1, 30]")]
    InvalidDaysBefore(i64),
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
    #[error(transparent)]
    StorageError(#[from] anyhow::Error),
}

#[async_trait::async_trait]
impl UseCase for UpdateReminderSettingsUseCase {
    type Response = OwnerProfile;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminderSettings";

    async fn execute(&mut self, ctx: &AbonaContext) -> Result<Self::Response, Self::Error> {
        if self.enabled.is_none()
            && self.hour.is_none()
            && self.days_before.is_none()
            && self.timezone.is_none()
        {
            return Err(UseCaseError::NothingToUpdate);
        }

        let mut owner = ctx
            .repos
            .owners
            .find(&self.owner_id)
            .await
            .ok_or_else(|| UseCaseError::OwnerNotFound(self.owner_id.clone()))?;

        let mut settings = owner.settings.clone();
        if let Some(enabled) = self.enabled {
            settings.enabled = enabled;
        }
        if let Some(hour) = self.hour {
            if !settings.set_hour(hour) {
                return Err(UseCaseError::InvalidHour(hour));
            }
        }
        if let Some(days_before) = self.days_before {
            if !settings.set_days_before(days_before) {
                return Err(UseCaseError::InvalidDaysBefore(days_before));
            }
        }
        if let Some(timezone) = &self.timezone {
            if !settings.set_timezone(timezone) {
                return Err(UseCaseError::InvalidTimezone(timezone.clone()));
            }
        }

        owner.settings = settings;
        ctx.repos.owners.save(&owner).await?;
        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use abona_domain::OwnerProfile;

    async fn seed_owner(ctx: &AbonaContext) -> OwnerProfile {
        let owner = OwnerProfile::new(1, None);
        ctx.repos.owners.insert(&owner).await.unwrap();
        owner
    }

    #[tokio::test]
    async fn updates_provided_fields_only() {
        let ctx = AbonaContext::create_inmemory();
        let owner = seed_owner(&ctx).await;

        let res = execute(
            UpdateReminderSettingsUseCase {
                owner_id: owner.id.clone(),
                enabled: None,
                hour: Some(18),
                days_before: None,
                timezone: Some("UTC".into()),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(res.settings.hour, 18);
        assert_eq!(res.settings.timezone, chrono_tz::UTC);
        // Untouched fields keep their defaults
        assert!(res.settings.enabled);
        assert_eq!(res.settings.days_before, 7);
    }

    #[tokio::test]
    async fn rejects_empty_update() {
        let ctx = AbonaContext::create_inmemory();
        let owner = seed_owner(&ctx).await;

        let res = execute(
            UpdateReminderSettingsUseCase {
                owner_id: owner.id,
                enabled: None,
                hour: None,
                days_before: None,
                timezone: None,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::NothingToUpdate)));
    }

    #[tokio::test]
    async fn invalid_field_leaves_settings_untouched() {
        let ctx = AbonaContext::create_inmemory();
        let owner = seed_owner(&ctx).await;

        let res = execute(
            UpdateReminderSettingsUseCase {
                owner_id: owner.id.clone(),
                enabled: Some(false),
                hour: Some(24),
                days_before: None,
                timezone: None,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::InvalidHour(24))));

        let stored = ctx.repos.owners.find(&owner.id).await.unwrap();
        assert!(stored.settings.enabled);
        assert_eq!(stored.settings.hour, 10);
    }
}
