use super::IClientRepo;
use abona_domain::{Client, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresClientRepo {
    pool: PgPool,
}

impl PostgresClientRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClientRaw {
    client_uid: Uuid,
    business_uid: Uuid,
    full_name: String,
    phone: String,
}

impl From<ClientRaw> for Client {
    fn from(e: ClientRaw) -> Self {
        Self {
            id: e.client_uid.into(),
            business_id: e.business_uid.into(),
            full_name: e.full_name,
            phone: e.phone,
        }
    }
}

#[async_trait::async_trait]
impl IClientRepo for PostgresClientRepo {
    async fn insert(&self, client: &Client) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clients
            (client_uid, business_uid, full_name, phone)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(client.id.inner_ref())
        .bind(client.business_id.inner_ref())
        .bind(&client.full_name)
        .bind(&client.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert client: {:?}. DB returned error: {:?}",
                client, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, client_id: &ID) -> Option<Client> {
        let res: Option<ClientRaw> = sqlx::query_as(
            r#"
            SELECT * FROM clients
            WHERE client_uid = $1
            "#,
        )
        .bind(client_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find client with id: {} failed. DB returned error: {:?}",
                client_id, e
            );
            e
        })
        .ok()?;
        res.map(|client| client.into())
    }

    async fn list_by_business_id(&self, business_id: &ID) -> anyhow::Result<Vec<Client>> {
        let clients_raw: Vec<ClientRaw> = sqlx::query_as(
            r#"
            SELECT * FROM clients
            WHERE business_uid = $1
            "#,
        )
        .bind(business_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "List clients for business: {} failed. DB returned error: {:?}",
                business_id, e
            );
            e
        })?;
        Ok(clients_raw.into_iter().map(|c| c.into()).collect())
    }
}
