//! Process configuration, read once from the environment at startup.
//!
//! | variable | default |
//! |---|---|
//! | `HTTP_ADDR` | `0.0.0.0:8080` |
//! | `AUTH_MODE` | `local` (`local` or `remote`) |
//! | `JWT_SECRET` | required in local mode |
//! | `ACCESS_TOKEN_TTL_SECS` | `900` |
//! | `REFRESH_TOKEN_TTL_SECS` | `2592000` |
//! | `ARGON2_MEMORY_KIB` / `ARGON2_ITERATIONS` / `ARGON2_PARALLELISM` | argon2 defaults |
//! | `AUTH_RPC_ADDRESS` | `http://127.0.0.1:50051` |
//! | `AUTH_RPC_TIMEOUT_MS` | `5000` |
//! | `IDENTITY_ADDR` | `0.0.0.0:50051` |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use forum_auth::{HashCost, TokenTtl};
use forum_infra::RemoteConfig;

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IDENTITY_ADDR: &str = "0.0.0.0:50051";
const DEFAULT_RPC_ADDRESS: &str = "http://127.0.0.1:50051";
const DEFAULT_RPC_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;
const DEFAULT_REFRESH_TTL_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything needed to run the in-process authority.
#[derive(Clone)]
pub struct LocalSettings {
    pub secret: String,
    pub ttl: TokenTtl,
    pub cost: HashCost,
}

impl core::fmt::Debug for LocalSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("cost", &self.cost)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum AuthMode {
    Local(LocalSettings),
    Remote(RemoteConfig),
}

impl AuthMode {
    pub fn name(&self) -> &'static str {
        match self {
            AuthMode::Local(_) => "local",
            AuthMode::Remote(_) => "remote",
        }
    }
}

/// Configuration of the forum HTTP API.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub auth: AuthMode,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);
        let http_addr: SocketAddr = env.parse_or("HTTP_ADDR", DEFAULT_HTTP_ADDR)?;

        let mode = env.get("AUTH_MODE").unwrap_or_else(|| "local".to_string());
        let auth = match mode.trim().to_ascii_lowercase().as_str() {
            "local" => AuthMode::Local(LocalSettings::from_env(&env)?),
            "remote" => {
                let address = env
                    .get("AUTH_RPC_ADDRESS")
                    .unwrap_or_else(|| DEFAULT_RPC_ADDRESS.to_string());
                let timeout_ms: u64 = env.parse_or("AUTH_RPC_TIMEOUT_MS", DEFAULT_RPC_TIMEOUT_MS)?;
                if timeout_ms == 0 {
                    return Err(ConfigError::Invalid {
                        key: "AUTH_RPC_TIMEOUT_MS",
                        value: timeout_ms.to_string(),
                        reason: "must be positive".to_string(),
                    });
                }
                AuthMode::Remote(RemoteConfig::new(address, Duration::from_millis(timeout_ms)))
            }
            _ => {
                return Err(ConfigError::Invalid {
                    key: "AUTH_MODE",
                    value: mode,
                    reason: "expected `local` or `remote`".to_string(),
                });
            }
        };

        Ok(Self { http_addr, auth })
    }
}

/// Configuration of the identity RPC service binary.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub addr: SocketAddr,
    pub local: LocalSettings,
}

impl IdentityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);
        Ok(Self {
            addr: env.parse_or("IDENTITY_ADDR", DEFAULT_IDENTITY_ADDR)?,
            local: LocalSettings::from_env(&env)?,
        })
    }
}

impl LocalSettings {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let secret = env
            .get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let access = env.positive("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?;
        let refresh = env.positive("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?;
        let ttl = TokenTtl {
            access: chrono::Duration::seconds(access),
            refresh: chrono::Duration::seconds(refresh),
        };

        let defaults = HashCost::default();
        let cost = HashCost {
            memory_kib: env.parse_or("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env.parse_or("ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: env.parse_or("ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self { secret, ttl, cost })
    }
}

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn parse_or<T>(&self, key: &'static str, default: impl ToString) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: core::fmt::Display,
    {
        let value = self.get(key).unwrap_or_else(|| default.to_string());
        value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        })
    }

    fn positive(&self, key: &'static str, default: i64) -> Result<i64, ConfigError> {
        let n: i64 = self.parse_or(key, default)?;
        if n <= 0 {
            return Err(ConfigError::Invalid {
                key,
                value: n.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(n)
    }
}
