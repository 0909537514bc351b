use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Timeout for the whole creation walk, in milliseconds
pub const CREATE_TIMEOUT_KEY: &str = "DAG_CREATE_TIMEOUT_MS";
/// Timeout for the whole destruction walk, in milliseconds
pub const DESTROY_TIMEOUT_KEY: &str = "DAG_DESTROY_TIMEOUT_MS";
/// Destroy the partially built graph when creation fails
pub const ROLLBACK_ON_FAILURE_KEY: &str = "DAG_ROLLBACK_ON_FAILURE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Configuration seeded from the process environment
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Get and parse `key`, `None` if unset
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value,
            })
    }

    pub fn get_millis(&self, key: &str) -> Result<Option<Duration>, ConfigError> {
        Ok(self.get_parsed::<u64>(key)?.map(Duration::from_millis))
    }
}

/// Settings of an [`Application`](crate::lifecycle::Application)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleConfig {
    pub create_timeout: Option<Duration>,
    pub destroy_timeout: Option<Duration>,
    pub rollback_on_failure: bool,
}

impl LifecycleConfig {
    pub fn from_service(config: &ConfigService) -> Result<Self, ConfigError> {
        Ok(Self {
            create_timeout: config.get_millis(CREATE_TIMEOUT_KEY)?,
            destroy_timeout: config.get_millis(DESTROY_TIMEOUT_KEY)?,
            rollback_on_failure: config
                .get_parsed(ROLLBACK_ON_FAILURE_KEY)?
                .unwrap_or_default(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_service(&ConfigService::new())
    }
}
