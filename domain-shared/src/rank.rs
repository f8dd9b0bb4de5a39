use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Reddit,
    User,
    Developer,
    Root,
}

impl Rank {
    pub const ALL: [Rank; 4] = [Rank::Reddit, Rank::User, Rank::Developer, Rank::Root];

    pub fn name(&self) -> &'static str {
        match self {
            Rank::Reddit => "REDDIT",
            Rank::User => "USER",
            Rank::Developer => "DEVELOPER",
            Rank::Root => "ROOT",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown rank {0}")]
pub struct ParseRankError(pub String);

/// Exact, upper-case name as it is persisted.
impl FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::ALL
            .into_iter()
            .find(|rank| rank.name() == s)
            .ok_or_else(|| ParseRankError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_names_are_exact() {
        assert_eq!("DEVELOPER".parse::<Rank>(), Ok(Rank::Developer));
        assert!("developer".parse::<Rank>().is_err());
    }
}
