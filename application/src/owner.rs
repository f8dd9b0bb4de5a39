use domain::user::{UserEntity, UserRepository, UserRepositoryError};
use domain_shared::discord::UserId;
use domain_shared::rank::Rank;
use tracing::{info, instrument};

/// Makes sure the owner of the bot holds DEVELOPER. Returns `true` if the rank was granted now.
#[instrument(level = "info", skip(user_repository))]
pub async fn grant_owner(
    user_repository: &(dyn UserRepository + Send + Sync),
    owner_id: UserId,
) -> Result<bool, UserRepositoryError> {
    let mut user = user_repository
        .get(owner_id)
        .await?
        .unwrap_or_else(|| UserEntity::new(owner_id));

    if !user.grant(Rank::Developer) {
        return Ok(false);
    }

    user_repository.put(&user).await?;
    info!("Owner granted DEVELOPER");

    Ok(true)
}
