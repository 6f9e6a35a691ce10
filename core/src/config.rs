//! Client configuration: target environment, base URL and transport timeout.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Path prefix under the host that every account URL hangs off.
pub const API_PREFIX: &str = "v1/organisation";

/// Per-call timeout applied by the bundled transport unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

pub const ENV_BASE_URL: &str = "ACCOUNTS_API_URL";
pub const ENV_ENVIRONMENT: &str = "ACCOUNTS_API_ENV";
pub const ENV_TIMEOUT_MS: &str = "ACCOUNTS_API_TIMEOUT_MS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown environment {0:?}")]
    UnknownEnvironment(String),

    #[error("invalid timeout {0:?}: expected milliseconds")]
    InvalidTimeout(String),
}

/// Deployments the accounts API is known to run in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Local,
    Test,
    Production,
}

impl Environment {
    pub fn host(&self) -> &'static str {
        match self {
            Environment::Local => "http://localhost:8080",
            Environment::Test => "https://internal.form3.com/test",
            Environment::Production => "https://internal.form3.com",
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}/{API_PREFIX}", self.host())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_environment(env: Environment) -> Self {
        Self::new(env.base_url())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `ACCOUNTS_API_URL`, falling back to the host of
    /// `ACCOUNTS_API_ENV` (default `local`). `ACCOUNTS_API_TIMEOUT_MS`
    /// overrides the timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(ENV_BASE_URL) {
            Some(url) => Self::new(url),
            None => {
                let env = match lookup(ENV_ENVIRONMENT) {
                    Some(name) => name.parse()?,
                    None => Environment::default(),
                };
                Self::from_environment(env)
            }
        };

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_environment(Environment::default())
    }
}
