// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TELEGRAM_BOT_TOKEN` | Bot token from BotFather, used to verify signatures | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;

/// Environment variable name for the Telegram bot token.
///
/// The token is the shared secret behind every Login Widget and Mini App
/// signature. It is never logged.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// `json` for structured logs, anything else for human-readable output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Placeholder token for local development builds (`--features dev`).
#[cfg(feature = "dev")]
pub const DEV_BOT_TOKEN: &str = "0:development-only-token";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN is not set")]
    MissingBotToken,

    #[error("PORT is not a valid port: {0}")]
    InvalidPort(String),

    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Startup configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub bind_addr: SocketAddr,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = match lookup(BOT_TOKEN_ENV).filter(|token| !token.trim().is_empty()) {
            Some(token) => token,
            None => fallback_bot_token()?,
        };

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(format!("{host}:{port}")))?;

        Ok(Self {
            bot_token,
            bind_addr,
        })
    }
}

#[cfg(feature = "dev")]
fn fallback_bot_token() -> Result<String, ConfigError> {
    tracing::warn!(
        "TELEGRAM_BOT_TOKEN is not set, using the development placeholder token; signatures from real bots will not verify"
    );
    Ok(DEV_BOT_TOKEN.to_string())
}

#[cfg(not(feature = "dev"))]
fn fallback_bot_token() -> Result<String, ConfigError> {
    Err(ConfigError::MissingBotToken)
}
