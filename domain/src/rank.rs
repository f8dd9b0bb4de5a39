use domain_shared::rank::Rank;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::{error, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("Unknown rank {0}")]
    UnknownRank(String),
}

/// Which ranks each rank implies.
///
/// A rank missing from the table implies only [`Rank::User`].
#[derive(Debug, Clone)]
pub struct RankLattice {
    closures: HashMap<Rank, BTreeSet<Rank>>,
}

impl RankLattice {
    pub fn new(closures: HashMap<Rank, BTreeSet<Rank>>) -> Self {
        Self { closures }
    }

    #[instrument(level = "debug", skip(self, ranks))]
    pub fn effective_ranks<S: AsRef<str>>(&self, ranks: &[S]) -> Result<BTreeSet<Rank>, RankError> {
        let mut effective = BTreeSet::new();

        for name in ranks {
            let name = name.as_ref();
            let rank = name.parse::<Rank>().map_err(|_| {
                error!(rank = name, "Persisted rank is not known");
                RankError::UnknownRank(name.to_string())
            })?;

            match self.closures.get(&rank) {
                Some(closure) => effective.extend(closure.iter().copied()),
                None => {
                    effective.insert(Rank::User);
                }
            }
        }

        Ok(effective)
    }
}

impl Default for RankLattice {
    fn default() -> Self {
        let closures = HashMap::from([
            (Rank::Reddit, BTreeSet::from([Rank::Reddit, Rank::User])),
            (Rank::Developer, BTreeSet::from([Rank::Developer, Rank::User])),
            (Rank::Root, BTreeSet::from(Rank::ALL)),
        ]);

        Self::new(closures)
    }
}
