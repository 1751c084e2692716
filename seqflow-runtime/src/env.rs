use rand::rngs::StdRng;
use rand::SeedableRng;
use seqflow_common::config::{keys, Configuration};
use seqflow_common::error::{SeqFlowError, SeqFlowResult};
use tracing::debug;

use crate::collection::Collection;
use crate::lazy::LazyCollection;

/// Resolved settings plus the configuration they were read from.
#[derive(Debug, Clone)]
pub struct Environment {
    pub config: Configuration,
    random_seed: Option<u64>,
    pull_limit: Option<usize>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            config: Configuration::new(),
            random_seed: None,
            pull_limit: None,
        }
    }

    pub fn from_config(config: Configuration) -> SeqFlowResult<Self> {
        let random_seed = config.get_parsed::<u64>(keys::RANDOM_SEED)?;
        let pull_limit = config.get_parsed::<usize>(keys::LAZY_PULL_LIMIT)?;
        if pull_limit == Some(0) {
            return Err(SeqFlowError::InvalidArgument(format!(
                "{} must be greater than zero",
                keys::LAZY_PULL_LIMIT
            )));
        }
        debug!(?random_seed, ?pull_limit, "environment configured");
        Ok(Self {
            config,
            random_seed,
            pull_limit,
        })
    }

    pub fn from_env() -> SeqFlowResult<Self> {
        Self::from_config(Configuration::from_env())
    }

    pub fn random_seed(&self) -> Option<u64> {
        self.random_seed
    }

    pub fn pull_limit(&self) -> Option<usize> {
        self.pull_limit
    }

    /// Seeded when `seqflow.random.seed` is set, OS-seeded otherwise.
    pub fn rng(&self) -> StdRng {
        match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn collect<T>(&self, values: Vec<T>) -> Collection<T> {
        Collection::from_vec(values)
    }

    /// Lazy collection carrying the configured pull limit.
    pub fn lazy<T, F, I>(&self, producer: F) -> LazyCollection<T>
    where
        T: 'static,
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let lazy = LazyCollection::make(producer);
        match self.pull_limit {
            Some(limit) => lazy.with_pull_limit(limit),
            None => lazy,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
