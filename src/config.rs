use crate::app_env;
use crate::db::PoolSettings;
use anyhow::{Context, anyhow, bail};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where to send OpenTelemetry data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtelEndpoints {
    pub spans: String,
    pub metrics: String,
}

/// Everything the server needs to know to start up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_url: String,
    pub server_port: u16,
    pub pool: PoolSettings,
    pub request_timeout: Duration,
    pub otel: Option<OtelEndpoints>,
}

impl AppConfig {
    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through [lookup], which returns the value of a variable if it's set
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let db_url = required(&lookup, app_env::DB_URL)?;
        let server_port = parse_required(&lookup, app_env::SERVER_PORT)?;

        let default_pool = PoolSettings::default();
        let pool = PoolSettings {
            max_connections: parse_optional(&lookup, app_env::DB_MAX_CONNECTIONS)?
                .unwrap_or(default_pool.max_connections),
            acquire_timeout: parse_optional(&lookup, app_env::DB_ACQUIRE_TIMEOUT_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(default_pool.acquire_timeout),
        };
        if pool.max_connections == 0 {
            bail!("{} must be at least 1", app_env::DB_MAX_CONNECTIONS);
        }

        let request_timeout = parse_optional(&lookup, app_env::REQUEST_TIMEOUT_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let otel = match (
            non_empty(&lookup, app_env::OTEL_SPAN_EXPORT_URL),
            non_empty(&lookup, app_env::OTEL_METRIC_EXPORT_URL),
        ) {
            (Some(spans), Some(metrics)) => Some(OtelEndpoints { spans, metrics }),
            _ => None,
        };

        Ok(AppConfig {
            db_url,
            server_port,
            pool,
            request_timeout,
            otel,
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, anyhow::Error> {
    non_empty(lookup, key).ok_or_else(|| anyhow!("the {key} environment variable must be set"))
}

fn parse_required<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = required(lookup, key)?;
    raw.trim()
        .parse()
        .with_context(|| format!("invalid value '{raw}' for {key}"))
}

fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, anyhow::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty(lookup, key) {
        None => Ok(None),
        Some(_) => parse_required(lookup, key).map(Some),
    }
}
