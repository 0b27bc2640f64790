//! Worker configuration loaded from environment variables.
//!
//! Required variables must be present and valid or the worker refuses to
//! start with a clear error message.

use ludik_directory::{ProviderConfig, RetryPolicy};
use ludik_jobs::ScheduleTime;
use secrecy::SecretString;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {detail}")]
    Invalid { name: &'static str, detail: String },
}

/// Full worker configuration.
pub struct WorkerConfig {
    pub database_url: String,
    pub provider_name: String,
    pub provider_base_url: String,
    pub provider_token_url: String,
    pub provider_client_id: String,
    pub provider_client_secret: SecretString,
    /// Geographic areas the nightly sync walks, in order.
    pub sync_areas: Vec<String>,
    pub sync_page_size: u32,
    pub sync_skip_limit: u32,
    pub sync_retry_limit: u32,
    pub daily_at: ScheduleTime,
    pub event_capacity: usize,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.is_empty() => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            detail: e.to_string(),
        }),
        _ => Ok(default),
    }
}

impl WorkerConfig {
    /// Load from the environment, fail-fast.
    pub fn from_env() -> Result<Self, ConfigError> {
        let sync_areas: Vec<String> = required("SYNC_AREAS")?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if sync_areas.is_empty() {
            return Err(ConfigError::Invalid {
                name: "SYNC_AREAS",
                detail: "expected a comma-separated list of areas".to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            provider_name: env::var("PROVIDER_NAME").unwrap_or_else(|_| "helloasso".to_string()),
            provider_base_url: required("PROVIDER_BASE_URL")?,
            provider_token_url: required("PROVIDER_TOKEN_URL")?,
            provider_client_id: required("PROVIDER_CLIENT_ID")?,
            provider_client_secret: SecretString::from(required("PROVIDER_CLIENT_SECRET")?),
            sync_areas,
            sync_page_size: parsed_or("SYNC_PAGE_SIZE", 20)?,
            sync_skip_limit: parsed_or("SYNC_SKIP_LIMIT", 10)?,
            sync_retry_limit: parsed_or("SYNC_RETRY_LIMIT", 3)?,
            daily_at: parsed_or("JOBS_DAILY_AT", ScheduleTime { hour: 2, minute: 0 })?,
            event_capacity: parsed_or("EVENT_CHANNEL_CAPACITY", 256)?,
        })
    }

    /// The Provider connection settings carried by the directory client.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(
            self.provider_name.clone(),
            self.provider_base_url.clone(),
            self.provider_token_url.clone(),
            self.provider_client_id.clone(),
            self.provider_client_secret.clone(),
        )
    }

    /// Retry policy for Provider page fetches.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.sync_retry_limit, 500)
    }
}
