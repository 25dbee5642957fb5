/*
 * Responsibility
 * - 環境変数の読み込み (PORT, APP_ENV, REDIS_* など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_SOCKET_TIMEOUT_SECS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Token -> user id store
    pub redis_auth_url: String,
    // global_features / active_features / features:user:<id> sets
    pub redis_features_url: String,
    pub redis_socket_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let redis_auth_url =
            std::env::var("REDIS_AUTH_HOST").map_err(|_| ConfigError::Missing("REDIS_AUTH_HOST"))?;

        let redis_features_url = std::env::var("REDIS_FEATURES_HOST")
            .map_err(|_| ConfigError::Missing("REDIS_FEATURES_HOST"))?;

        let redis_socket_timeout = match std::env::var("REDIS_SOCKET_TIMEOUT") {
            Ok(raw) => parse_socket_timeout(&raw)?,
            Err(_) => Duration::from_secs_f64(DEFAULT_SOCKET_TIMEOUT_SECS),
        };

        Ok(Self {
            addr,
            app_env,
            redis_auth_url,
            redis_features_url,
            redis_socket_timeout,
        })
    }
}

/// Seconds, fractional allowed (`"0.5"`, `"2"`).
fn parse_socket_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid("REDIS_SOCKET_TIMEOUT"))?;

    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::Invalid("REDIS_SOCKET_TIMEOUT"));
    }

    Ok(Duration::from_secs_f64(secs))
}
