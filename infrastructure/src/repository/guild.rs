use async_trait::async_trait;
use domain::guild::{GuildEntity, GuildRepository, GuildRepositoryError};
use domain_shared::discord::GuildId;
use sqlx::types::Json;
use sqlx::{query, query_as, PgPool};
use tracing::{instrument, warn};

pub struct PostgresGuildRepository {
    pool: PgPool,
}

impl PostgresGuildRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_err(err: sqlx::Error) -> GuildRepositoryError {
    warn!(error = ?err, "Guild repository query failed");
    GuildRepositoryError::ServiceUnavailable
}

#[async_trait]
impl GuildRepository for PostgresGuildRepository {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, guild_id: GuildId) -> Result<Option<GuildEntity>, GuildRepositoryError> {
        let row: Option<(Json<GuildEntity>,)> =
            query_as("SELECT data FROM guilds WHERE guild_id = $1")
                .bind(guild_id.0 as i64)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(row.map(|(Json(guild),)| guild))
    }

    #[instrument(level = "debug", skip(self, entity), fields(guild_id = entity.guild_id.0))]
    async fn put(&self, entity: &GuildEntity) -> Result<u64, GuildRepositoryError> {
        let result = query(
            "INSERT INTO guilds (guild_id, data) VALUES ($1, $2) ON CONFLICT (guild_id) DO UPDATE SET data = $2",
        )
        .bind(entity.guild_id.0 as i64)
        .bind(Json(entity))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete(&self, guild_id: GuildId) -> Result<u64, GuildRepositoryError> {
        let result = query("DELETE FROM guilds WHERE guild_id = $1")
            .bind(guild_id.0 as i64)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_all(&self) -> Result<Vec<GuildEntity>, GuildRepositoryError> {
        let rows: Vec<(Json<GuildEntity>,)> = query_as("SELECT data FROM guilds")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(|(Json(guild),)| guild).collect())
    }
}
