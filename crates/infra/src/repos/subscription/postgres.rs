use super::ISubscriptionRepo;
use abona_domain::{Subscription, SubscriptionStatus, ID};
use chrono::NaiveDate;
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresSubscriptionRepo {
    pool: PgPool,
}

impl PostgresSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubscriptionRaw {
    subscription_uid: Uuid,
    business_uid: Uuid,
    client_uid: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    reminder_sent_at: Option<i64>,
}

impl From<SubscriptionRaw> for Subscription {
    fn from(e: SubscriptionRaw) -> Self {
        Self {
            id: e.subscription_uid.into(),
            business_id: e.business_uid.into(),
            client_id: e.client_uid.into(),
            start_date: e.start_date,
            end_date: e.end_date,
            // The column carries a CHECK constraint over the known statuses
            status: e
                .status
                .parse::<SubscriptionStatus>()
                .unwrap_or(SubscriptionStatus::Expired),
            reminder_sent_at: e.reminder_sent_at,
        }
    }
}

#[async_trait::async_trait]
impl ISubscriptionRepo for PostgresSubscriptionRepo {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions
            (subscription_uid, business_uid, client_uid, start_date, end_date, status, reminder_sent_at)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(subscription.id.inner_ref())
        .bind(subscription.business_id.inner_ref())
        .bind(subscription.client_id.inner_ref())
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.status.as_str())
        .bind(subscription.reminder_sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert subscription: {:?}. DB returned error: {:?}",
                subscription, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, subscription: &Subscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET start_date = $2,
            end_date = $3,
            status = $4,
            reminder_sent_at = $5
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription.id.inner_ref())
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.status.as_str())
        .bind(subscription.reminder_sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save subscription: {:?}. DB returned error: {:?}",
                subscription, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, subscription_id: &ID) -> Option<Subscription> {
        let res: Option<SubscriptionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM subscriptions
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find subscription with id: {} failed. DB returned error: {:?}",
                subscription_id, e
            );
            e
        })
        .ok()?;
        res.map(|subscription| subscription.into())
    }

    async fn list_by_business_id(&self, business_id: &ID) -> anyhow::Result<Vec<Subscription>> {
        let subscriptions_raw: Vec<SubscriptionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM subscriptions
            WHERE business_uid = $1
            "#,
        )
        .bind(business_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "List subscriptions for business: {} failed. DB returned error: {:?}",
                business_id, e
            );
            e
        })?;
        Ok(subscriptions_raw.into_iter().map(|s| s.into()).collect())
    }

    async fn find_reminder_candidates(
        &self,
        business_id: &ID,
        today: NaiveDate,
        days_until: i64,
        require_not_yet_reminded: bool,
    ) -> anyhow::Result<Vec<Subscription>> {
        let horizon = today + chrono::Duration::days(days_until);
        let subscriptions_raw: Vec<SubscriptionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM subscriptions
            WHERE business_uid = $1 AND
            status = 'active' AND
            end_date >= $2 AND
            end_date <= $3 AND
            (reminder_sent_at IS NULL OR $4 = false)
            ORDER BY end_date ASC
            "#,
        )
        .bind(business_id.inner_ref())
        .bind(today)
        .bind(horizon)
        .bind(require_not_yet_reminded)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find reminder candidates for business: {} failed. DB returned error: {:?}",
                business_id, e
            );
            e
        })?;
        Ok(subscriptions_raw.into_iter().map(|s| s.into()).collect())
    }

    async fn claim_reminder_slot(
        &self,
        subscription_id: &ID,
        sent_at: i64,
    ) -> anyhow::Result<bool> {
        // Row-level atomicity of UPDATE makes this the arbiter between
        // concurrent sweepers. Only one caller observes an affected row.
        let res = sqlx::query(
            r#"
            UPDATE subscriptions
            SET reminder_sent_at = $2
            WHERE subscription_uid = $1 AND reminder_sent_at IS NULL
            "#,
        )
        .bind(subscription_id.inner_ref())
        .bind(sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Claim reminder slot for subscription: {} failed. DB returned error: {:?}",
                subscription_id, e
            );
            e
        })?;
        Ok(res.rows_affected() == 1)
    }

    async fn release_reminder_slot(&self, subscription_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET reminder_sent_at = NULL
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription_id.inner_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Release reminder slot for subscription: {} failed. DB returned error: {:?}",
                subscription_id, e
            );
            e
        })?;
        Ok(())
    }
}
