use super::IBusinessRepo;
use abona_domain::{Business, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresBusinessRepo {
    pool: PgPool,
}

impl PostgresBusinessRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BusinessRaw {
    business_uid: Uuid,
    owner_uid: Uuid,
    name: String,
}

impl From<BusinessRaw> for Business {
    fn from(e: BusinessRaw) -> Self {
        Self {
            id: e.business_uid.into(),
            owner_id: e.owner_uid.into(),
            name: e.name,
        }
    }
}

#[async_trait::async_trait]
impl IBusinessRepo for PostgresBusinessRepo {
    async fn insert(&self, business: &Business) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO businesses
            (business_uid, owner_uid, name)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(business.id.inner_ref())
        .bind(business.owner_id.inner_ref())
        .bind(&business.name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert business: {:?}. DB returned error: {:?}",
                business, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, business: &Business) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE businesses
            SET name = $2
            WHERE business_uid = $1
            "#,
        )
        .bind(business.id.inner_ref())
        .bind(&business.name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save business: {:?}. DB returned error: {:?}",
                business, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, business_id: &ID) -> Option<Business> {
        let res: Option<BusinessRaw> = sqlx::query_as(
            r#"
            SELECT * FROM businesses
            WHERE business_uid = $1
            "#,
        )
        .bind(business_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find business with id: {} failed. DB returned error: {:?}",
                business_id, e
            );
            e
        })
        .ok()?;
        res.map(|business| business.into())
    }

    async fn find_by_owner_id(&self, owner_id: &ID) -> Option<Business> {
        let res: Option<BusinessRaw> = sqlx::query_as(
            r#"
            SELECT * FROM businesses
            WHERE owner_uid = $1
            LIMIT 1
            "#,
        )
        .bind(owner_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find business for owner: {} failed. DB returned error: {:?}",
                owner_id, e
            );
            e
        })
        .ok()?;
        res.map(|business| business.into())
    }

    async fn list_by_owner_id(&self, owner_id: &ID) -> anyhow::Result<Vec<Business>> {
        let businesses_raw: Vec<BusinessRaw> = sqlx::query_as(
            r#"
            SELECT * FROM businesses
            WHERE owner_uid = $1
            "#,
        )
        .bind(owner_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "List businesses for owner: {} failed. DB returned error: {:?}",
                owner_id, e
            );
            e
        })?;
        Ok(businesses_raw.into_iter().map(|b| b.into()).collect())
    }
}
