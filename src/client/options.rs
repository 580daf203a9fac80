use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::client::{ContactoSmsError, DEFAULT_QUERY_TIMEOUT, DEFAULT_TIMEOUT};
use crate::domain::{ApiKey, ApiUrl, SecretKey, ValidationError};

pub const ENV_API_KEY: &str = "CONTACTOSMS_API_KEY";
pub const ENV_SECRET_KEY: &str = "CONTACTOSMS_SECRET_KEY";
pub const ENV_API_URL: &str = "CONTACTOSMS_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CONTACTOSMS_TIMEOUT_SECS";
pub const ENV_QUERY_TIMEOUT_SECS: &str = "CONTACTOSMS_QUERY_TIMEOUT_SECS";
pub const ENV_ENABLE_LOGGING: &str = "CONTACTOSMS_ENABLE_LOGGING";
pub const ENV_PROXY_URL: &str = "CONTACTOSMS_PROXY_URL";
pub const ENV_PROXY_USERNAME: &str = "CONTACTOSMS_PROXY_USERNAME";
pub const ENV_PROXY_PASSWORD: &str = "CONTACTOSMS_PROXY_PASSWORD";

const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

#[derive(Clone, Deserialize)]
#[serde(default)]
/// Everything needed to build a [`ContactoSmsClient`](crate::ContactoSmsClient).
///
/// Deserializable from any serde source, or read from `CONTACTOSMS_*` variables with
/// [`ClientOptions::from_env`].
pub struct ClientOptions {
    pub api_key: String,
    pub secret_key: String,
    /// Base URL, e.g. `https://host/api/`.
    pub api_url: String,
    pub timeout_secs: u64,
    pub query_timeout_secs: u64,
    pub enable_logging: bool,
    pub proxy: Option<ProxyOptions>,
    pub retry: RetryOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            api_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT.as_secs(),
            enable_logging: false,
            proxy: None,
            retry: RetryOptions::default(),
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("query_timeout_secs", &self.query_timeout_secs)
            .field("enable_logging", &self.enable_logging)
            .field("proxy", &self.proxy)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ClientOptions {
    /// Read options from the process environment.
    ///
    /// Reads:
    /// - `CONTACTOSMS_API_KEY`, `CONTACTOSMS_SECRET_KEY`, `CONTACTOSMS_API_URL` (required)
    /// - `CONTACTOSMS_TIMEOUT_SECS`, `CONTACTOSMS_QUERY_TIMEOUT_SECS`: whole seconds
    /// - `CONTACTOSMS_ENABLE_LOGGING`: `true`/`1`
    /// - `CONTACTOSMS_PROXY_URL` with optional `_USERNAME` / `_PASSWORD`
    pub fn from_env() -> Result<Self, ContactoSmsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientOptions::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ContactoSmsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ContactoSmsError::Config {
                    var,
                    reason: "not set".to_owned(),
                })
        };
        let seconds = |var: &'static str, default: Duration| match lookup(var) {
            None => Ok(default.as_secs()),
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|err| ContactoSmsError::Config {
                    var,
                    reason: err.to_string(),
                }),
        };

        let proxy = lookup(ENV_PROXY_URL)
            .filter(|address| !address.trim().is_empty())
            .map(|address| ProxyOptions {
                address,
                username: lookup(ENV_PROXY_USERNAME),
                password: lookup(ENV_PROXY_PASSWORD),
            });

        Ok(Self {
            api_key: required(ENV_API_KEY)?,
            secret_key: required(ENV_SECRET_KEY)?,
            api_url: required(ENV_API_URL)?,
            timeout_secs: seconds(ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT)?,
            query_timeout_secs: seconds(ENV_QUERY_TIMEOUT_SECS, DEFAULT_QUERY_TIMEOUT)?,
            enable_logging: lookup(ENV_ENABLE_LOGGING)
                .map(|value| matches!(value.trim(), "true" | "1"))
                .unwrap_or(false),
            proxy,
            retry: RetryOptions::default(),
        })
    }

    /// Check every field without building anything.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ApiKey::new(self.api_key.as_str())?;
        SecretKey::new(self.secret_key.as_str())?;
        ApiUrl::parse(self.api_url.as_str())?;
        if self.timeout_secs == 0 {
            return Err(ValidationError::ZeroDuration {
                field: "timeout_secs",
            });
        }
        if self.query_timeout_secs == 0 {
            return Err(ValidationError::ZeroDuration {
                field: "query_timeout_secs",
            });
        }
        if let Some(proxy) = self.proxy.as_ref() {
            if proxy.address.trim().is_empty() {
                return Err(ValidationError::Empty {
                    field: "proxy.address",
                });
            }
        }
        if self.retry.max_attempts == 0 {
            return Err(ValidationError::ZeroCount {
                field: "retry.max_attempts",
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
/// Outbound HTTP proxy, with optional basic auth.
pub struct ProxyOptions {
    pub address: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for ProxyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyOptions")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ProxyOptions {
    pub(crate) fn to_reqwest(&self) -> Result<reqwest::Proxy, ContactoSmsError> {
        let proxy =
            reqwest::Proxy::all(self.address.trim()).map_err(ContactoSmsError::HttpClient)?;
        Ok(match self.username.as_deref() {
            Some(username) if !username.is_empty() => {
                proxy.basic_auth(username, self.password.as_deref().unwrap_or_default())
            }
            _ => proxy,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}
