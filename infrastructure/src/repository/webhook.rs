use async_trait::async_trait;
use domain::webhook::{WebhookEntity, WebhookRepository, WebhookRepositoryError};
use domain_shared::discord::{GuildId, WebhookId};
use sqlx::types::Json;
use sqlx::{query, query_as, PgPool};
use tracing::{instrument, warn};

pub struct PostgresWebhookRepository {
    pool: PgPool,
}

impl PostgresWebhookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_err(err: sqlx::Error) -> WebhookRepositoryError {
    warn!(error = ?err, "Webhook repository query failed");
    WebhookRepositoryError::ServiceUnavailable
}

#[async_trait]
impl WebhookRepository for PostgresWebhookRepository {
    #[instrument(level = "debug", skip(self))]
    async fn get(
        &self,
        webhook_id: WebhookId,
    ) -> Result<Option<WebhookEntity>, WebhookRepositoryError> {
        let row: Option<(Json<WebhookEntity>,)> =
            query_as("SELECT data FROM webhooks WHERE webhook_id = $1")
                .bind(webhook_id.0 as i64)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(row.map(|(Json(webhook),)| webhook))
    }

    #[instrument(level = "debug", skip(self, entity), fields(webhook_id = entity.webhook_id.0))]
    async fn put(&self, entity: &WebhookEntity) -> Result<u64, WebhookRepositoryError> {
        let result = query(
            "INSERT INTO webhooks (webhook_id, guild_id, channel_id, data) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (webhook_id) DO UPDATE SET guild_id = $2, channel_id = $3, data = $4",
        )
        .bind(entity.webhook_id.0 as i64)
        .bind(entity.guild_id.0 as i64)
        .bind(entity.channel_id.0 as i64)
        .bind(Json(entity))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete(&self, webhook_id: WebhookId) -> Result<u64, WebhookRepositoryError> {
        let result = query("DELETE FROM webhooks WHERE webhook_id = $1")
            .bind(webhook_id.0 as i64)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_all(&self) -> Result<Vec<WebhookEntity>, WebhookRepositoryError> {
        let rows: Vec<(Json<WebhookEntity>,)> = query_as("SELECT data FROM webhooks")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(|(Json(webhook),)| webhook).collect())
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_by_guild(
        &self,
        guild_id: GuildId,
    ) -> Result<Vec<WebhookEntity>, WebhookRepositoryError> {
        let rows: Vec<(Json<WebhookEntity>,)> =
            query_as("SELECT data FROM webhooks WHERE guild_id = $1 ORDER BY webhook_id")
                .bind(guild_id.0 as i64)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(|(Json(webhook),)| webhook).collect())
    }
}
