use crate::error::{SeqFlowError, SeqFlowResult};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

pub mod keys {
    /// Seed for `Environment::rng`; unset means OS entropy.
    pub const RANDOM_SEED: &str = "seqflow.random.seed";
    /// Upper bound on raw producer pulls per lazy terminal operation.
    pub const LAZY_PULL_LIMIT: &str = "seqflow.lazy.pull_limit";
}

const ENV_PREFIX: &str = "SEQFLOW_";

#[derive(Debug, Clone, Default)]
pub struct Configuration {
    config: HashMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            config: HashMap::new(),
        }
    }

    /// Reads every `SEQFLOW_*` process variable, mapping
    /// `SEQFLOW_LAZY_PULL_LIMIT` to `seqflow.lazy.pull_limit`.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        for (name, value) in std::env::vars() {
            if let Some(rest) = name.strip_prefix(ENV_PREFIX) {
                config.put(env_to_key(rest), value);
            }
        }
        config
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.config.get(key)
    }

    pub fn get_string(&self, key: &str, default_value: &str) -> String {
        self.config
            .get(key)
            .cloned()
            .unwrap_or_else(|| default_value.to_string())
    }

    pub fn get_parsed<T>(&self, key: &str) -> SeqFlowResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.config.get(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                SeqFlowError::InvalidArgument(format!("config {key}={raw:?}: {e}"))
            }),
        }
    }
}

fn env_to_key(rest: &str) -> String {
    // the first underscore separates the section, the rest belong to the leaf name
    let lower = rest.to_ascii_lowercase();
    match lower.split_once('_') {
        Some((section, leaf)) => format!("seqflow.{section}.{leaf}"),
        None => format!("seqflow.{lower}"),
    }
}
