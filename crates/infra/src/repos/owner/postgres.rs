use super::IOwnerRepo;
use abona_domain::{OwnerProfile, ReminderSettings, ID};
use chrono_tz::Tz;
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresOwnerRepo {
    pool: PgPool,
}

impl PostgresOwnerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OwnerProfileRaw {
    owner_uid: Uuid,
    external_user_id: i64,
    full_name: Option<String>,
    reminder_enabled: bool,
    reminder_hour: i32,
    reminder_days_before: i32,
    timezone: String,
}

impl From<OwnerProfileRaw> for OwnerProfile {
    fn from(e: OwnerProfileRaw) -> Self {
        Self {
            id: e.owner_uid.into(),
            external_user_id: e.external_user_id,
            full_name: e.full_name,
            settings: ReminderSettings {
                enabled: e.reminder_enabled,
                hour: e.reminder_hour as u32,
                days_before: e.reminder_days_before as i64,
                timezone: e.timezone.parse::<Tz>().unwrap_or(chrono_tz::UTC),
            },
        }
    }
}

const INSERT_OWNER: &str = r#"
    INSERT INTO owner_profiles
    (owner_uid, external_user_id, full_name, reminder_enabled, reminder_hour, reminder_days_before, timezone)
    VALUES($1, $2, $3, $4, $5, $6, $7)
"#;

#[async_trait::async_trait]
impl IOwnerRepo for PostgresOwnerRepo {
    async fn insert(&self, owner: &OwnerProfile) -> anyhow::Result<()> {
        sqlx::query(INSERT_OWNER)
            .bind(owner.id.inner_ref())
            .bind(owner.external_user_id)
            .bind(&owner.full_name)
            .bind(owner.settings.enabled)
            .bind(owner.settings.hour as i32)
            .bind(owner.settings.days_before as i32)
            .bind(owner.settings.timezone.name())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to insert owner: {:?}. DB returned error: {:?}",
                    owner, e
                );
                e
            })?;
        Ok(())
    }

    async fn insert_if_absent(&self, owner: &OwnerProfile) -> anyhow::Result<bool> {
        // The uniqueness constraint on external_user_id is the only mutual
        // exclusion between concurrently provisioning instances
        let res = sqlx::query(&format!(
            "{} ON CONFLICT (external_user_id) DO NOTHING",
            INSERT_OWNER
        ))
        .bind(owner.id.inner_ref())
        .bind(owner.external_user_id)
        .bind(&owner.full_name)
        .bind(owner.settings.enabled)
        .bind(owner.settings.hour as i32)
        .bind(owner.settings.days_before as i32)
        .bind(owner.settings.timezone.name())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert owner if absent: {:?}. DB returned error: {:?}",
                owner, e
            );
            e
        })?;
        Ok(res.rows_affected() == 1)
    }

    async fn save(&self, owner: &OwnerProfile) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE owner_profiles
            SET full_name = $2,
            reminder_enabled = $3,
            reminder_hour = $4,
            reminder_days_before = $5,
            timezone = $6
            WHERE owner_uid = $1
            "#,
        )
        .bind(owner.id.inner_ref())
        .bind(&owner.full_name)
        .bind(owner.settings.enabled)
        .bind(owner.settings.hour as i32)
        .bind(owner.settings.days_before as i32)
        .bind(owner.settings.timezone.name())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save owner: {:?}. DB returned error: {:?}",
                owner, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, owner_id: &ID) -> Option<OwnerProfile> {
        let res: Option<OwnerProfileRaw> = sqlx::query_as(
            r#"
            SELECT * FROM owner_profiles
            WHERE owner_uid = $1
            "#,
        )
        .bind(owner_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find owner with id: {} failed. DB returned error: {:?}",
                owner_id, e
            );
            e
        })
        .ok()?;
        res.map(|owner| owner.into())
    }

    async fn find_by_external_id(&self, external_user_id: i64) -> Option<OwnerProfile> {
        let res: Option<OwnerProfileRaw> = sqlx::query_as(
            r#"
            SELECT * FROM owner_profiles
            WHERE external_user_id = $1
            "#,
        )
        .bind(external_user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find owner with external user id: {} failed. DB returned error: {:?}",
                external_user_id, e
            );
            e
        })
        .ok()?;
        res.map(|owner| owner.into())
    }

    async fn find_reminder_enabled(&self) -> anyhow::Result<Vec<OwnerProfile>> {
        let owners_raw: Vec<OwnerProfileRaw> = sqlx::query_as(
            r#"
            SELECT * FROM owner_profiles
            WHERE reminder_enabled = true
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find owners with reminders enabled failed. DB returned error: {:?}",
                e
            );
            e
        })?;
        Ok(owners_raw.into_iter().map(|owner| owner.into()).collect())
    }
}
