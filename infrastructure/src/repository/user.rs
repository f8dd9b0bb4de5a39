use async_trait::async_trait;
use domain::user::{UserEntity, UserRepository, UserRepositoryError};
use domain_shared::discord::UserId;
use sqlx::types::Json;
use sqlx::{query, query_as, PgPool};
use tracing::{instrument, warn};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_err(err: sqlx::Error) -> UserRepositoryError {
    warn!(error = ?err, "User repository query failed");
    UserRepositoryError::ServiceUnavailable
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, user_id: UserId) -> Result<Option<UserEntity>, UserRepositoryError> {
        let row: Option<(Json<UserEntity>,)> = query_as("SELECT data FROM users WHERE user_id = $1")
            .bind(user_id.0 as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(row.map(|(Json(user),)| user))
    }

    #[instrument(level = "debug", skip(self, entity), fields(user_id = entity.user_id.0))]
    async fn put(&self, entity: &UserEntity) -> Result<u64, UserRepositoryError> {
        let result = query(
            "INSERT INTO users (user_id, data) VALUES ($1, $2) ON CONFLICT (user_id) DO UPDATE SET data = $2",
        )
        .bind(entity.user_id.0 as i64)
        .bind(Json(entity))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete(&self, user_id: UserId) -> Result<u64, UserRepositoryError> {
        let result = query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.0 as i64)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }
}
