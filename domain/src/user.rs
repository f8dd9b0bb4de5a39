use async_trait::async_trait;
use domain_shared::discord::UserId;
use domain_shared::rank::Rank;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntity {
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    /// Persisted rank names, upper case.
    #[serde(default)]
    pub ranks: Vec<String>,
}

impl UserEntity {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            name: None,
            ranks: Vec::new(),
        }
    }

    pub fn has_rank(&self, rank: Rank) -> bool {
        self.ranks.iter().any(|name| name == rank.name())
    }

    /// Returns `true` if the rank was added.
    pub fn grant(&mut self, rank: Rank) -> bool {
        if self.has_rank(rank) {
            return false;
        }
        self.ranks.push(rank.name().to_string());
        true
    }

    /// Returns `true` if the rank was present.
    pub fn revoke(&mut self, rank: Rank) -> bool {
        let before = self.ranks.len();
        self.ranks.retain(|name| name != rank.name());
        self.ranks.len() != before
    }
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait UserRepository {
    async fn get(&self, user_id: UserId) -> Result<Option<UserEntity>, UserRepositoryError>;
    async fn put(&self, entity: &UserEntity) -> Result<u64, UserRepositoryError>;
    async fn delete(&self, user_id: UserId) -> Result<u64, UserRepositoryError>;
}

#[derive(Debug, Error)]
pub enum UserRepositoryError {
    #[error("Service unavailable")]
    ServiceUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_does_not_duplicate() {
        let mut user = UserEntity::new(UserId(1));

        assert!(user.grant(Rank::Developer));
        assert!(!user.grant(Rank::Developer));
        assert_eq!(user.ranks, vec!["DEVELOPER"]);
    }

    #[test]
    fn revoke_reports_presence() {
        let mut user = UserEntity::new(UserId(1));
        user.grant(Rank::Root);

        assert!(user.revoke(Rank::Root));
        assert!(!user.revoke(Rank::Root));
        assert!(user.ranks.is_empty());
    }
}
