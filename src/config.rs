// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. Any error
//! here is fatal: the gateway refuses to start with a missing or weak key.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC signing key (at least 32 bytes) | Required |
//! | `JWT_TTL_SECS` | Token lifetime in seconds | `3600` |
//! | `USERS_FILE` | JSON user table | Optional (empty store) |
//! | `ACCESS_RULES_FILE` | JSON access rule table | Optional (built-in rules) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::time::Duration;

use crate::auth::token::{DEFAULT_TOKEN_TTL, MIN_SECRET_LEN};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_TTL_SECS_ENV: &str = "JWT_TTL_SECS";
pub const USERS_FILE_ENV: &str = "USERS_FILE";
pub const ACCESS_RULES_FILE_ENV: &str = "ACCESS_RULES_FILE";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is required", var = JWT_SECRET_ENV)]
    MissingSecret,

    #[error("{var} must be at least {min} bytes, got {0}", var = JWT_SECRET_ENV, min = MIN_SECRET_LEN)]
    WeakSecret(usize),

    #[error("invalid value for {name}: `{value}`")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub users_file: Option<PathBuf>,
    pub access_rules_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to read variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::MissingSecret)?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret(jwt_secret.len()));
        }

        let port = match lookup(PORT_ENV) {
            Some(value) => parse(PORT_ENV, value)?,
            None => DEFAULT_PORT,
        };
        let token_ttl = match lookup(JWT_TTL_SECS_ENV) {
            Some(value) => match parse::<u64>(JWT_TTL_SECS_ENV, value.clone())? {
                0 => {
                    return Err(ConfigError::InvalidValue {
                        name: JWT_TTL_SECS_ENV,
                        value,
                    })
                }
                secs => Duration::from_secs(secs),
            },
            None => DEFAULT_TOKEN_TTL,
        };
        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            jwt_secret,
            token_ttl,
            users_file: lookup(USERS_FILE_ENV).map(PathBuf::from),
            access_rules_file: lookup(ACCESS_RULES_FILE_ENV).map(PathBuf::from),
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("users_file", &self.users_file)
            .field("access_rules_file", &self.access_rules_file)
            .field("log_format", &self.log_format)
            .finish()
    }
}
