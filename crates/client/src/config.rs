//! Client configuration from environment variables.
//!
//! | Variable              | Default              |
//! |-----------------------|----------------------|
//! | `UKS_API_URL`         | detected from origin |
//! | `UKS_ORIGIN`          | `http://localhost`   |
//! | `UKS_BACKEND`         | `http`               |
//! | `UKS_TIMEOUT_MS`      | `10000`              |
//! | `UKS_REFRESH_SECS`    | `300`                |
//! | `UKS_MOCK_LATENCY_MS` | per-operation        |

use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

pub const DEFAULT_ORIGIN: &str = "http://localhost";
pub const LOCAL_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
    #[error("unknown backend mode {0:?} (expected \"http\" or \"mock\")")]
    InvalidMode(String),
}

/// Which `ClinicBackend` the composition root builds.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    #[default]
    Http,
    Mock,
}

impl FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "api" => Ok(BackendMode::Http),
            "mock" => Ok(BackendMode::Mock),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

/// Base address of the clinic API, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApiBaseUrl(String);

impl ApiBaseUrl {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self(url.trim_end_matches('/').to_string())
    }

    /// Local development talks to the backend on port 5000; any other origin
    /// serves the API from its own `/api` path.
    pub fn detect(origin: &str) -> Self {
        let origin = origin.trim().trim_end_matches('/');
        match host_of(origin) {
            Some("localhost") | Some("127.0.0.1") => Self::new(LOCAL_API_URL),
            _ => Self::new(format!("{origin}/api")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ApiBaseUrl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

fn host_of(origin: &str) -> Option<&str> {
    let rest = origin.split_once("://").map_or(origin, |(_, rest)| rest);
    let authority = rest.split('/').next()?;
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = authority.split(':').next()?;
    (!host.is_empty()).then_some(host)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    pub base_url: ApiBaseUrl,
    pub mode: BackendMode,
    pub request_timeout: Duration,
    pub refresh_interval: Duration,
    /// Replaces every per-operation mock latency when set.
    pub mock_latency: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: ApiBaseUrl::detect(DEFAULT_ORIGIN),
            mode: BackendMode::Http,
            request_timeout: DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            mock_latency: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = match get("UKS_API_URL") {
            Some(url) => ApiBaseUrl::new(url.trim()),
            None => {
                let origin = get("UKS_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
                ApiBaseUrl::detect(&origin)
            }
        };

        let mode = match get("UKS_BACKEND") {
            Some(raw) => raw.parse()?,
            None => BackendMode::default(),
        };

        let request_timeout = match get("UKS_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(positive("UKS_TIMEOUT_MS", &raw)?),
            None => DEFAULT_TIMEOUT,
        };

        let refresh_interval = match get("UKS_REFRESH_SECS") {
            Some(raw) => Duration::from_secs(positive("UKS_REFRESH_SECS", &raw)?),
            None => DEFAULT_REFRESH_INTERVAL,
        };

        let mock_latency = get("UKS_MOCK_LATENCY_MS")
            .map(|raw| number("UKS_MOCK_LATENCY_MS", &raw).map(Duration::from_millis))
            .transpose()?;

        if mode == BackendMode::Http && mock_latency.is_some() {
            tracing::warn!("UKS_MOCK_LATENCY_MS is ignored when UKS_BACKEND=http");
        }

        Ok(Self {
            base_url,
            mode,
            request_timeout,
            refresh_interval,
            mock_latency,
        })
    }
}

fn number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}

fn positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match number(key, raw)? {
        0 => Err(ConfigError::Zero { key }),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_target_local_backend() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.base_url.as_str(), "http://localhost:5000/api");
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.refresh_interval, Duration::from_secs(300));
    }

    #[test]
    fn detection_by_origin_host() {
        assert_eq!(ApiBaseUrl::detect("http://127.0.0.1:8080").as_str(), LOCAL_API_URL);
        assert_eq!(ApiBaseUrl::detect("http://localhost:3000/").as_str(), LOCAL_API_URL);
        assert_eq!(
            ApiBaseUrl::detect("https://uks.sekolah.sch.id").as_str(),
            "https://uks.sekolah.sch.id/api"
        );
        assert_eq!(
            ApiBaseUrl::detect("https://uks.example.org:8443/").as_str(),
            "https://uks.example.org:8443/api"
        );
    }

    #[test]
    fn explicit_url_wins_over_origin() {
        let cfg = config(&[
            ("UKS_API_URL", "http://10.0.0.5:5000/api/"),
            ("UKS_ORIGIN", "https://uks.example.org"),
        ])
        .unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://10.0.0.5:5000/api");
    }

    #[test]
    fn parses_mode_and_numbers() {
        let cfg = config(&[
            ("UKS_BACKEND", "Mock"),
            ("UKS_TIMEOUT_MS", "2500"),
            ("UKS_REFRESH_SECS", "60"),
            ("UKS_MOCK_LATENCY_MS", "0"),
        ])
        .unwrap();
        assert_eq!(cfg.mode, BackendMode::Mock);
        assert_eq!(cfg.request_timeout, Duration::from_millis(2500));
        assert_eq!(cfg.refresh_interval, Duration::from_secs(60));
        assert_eq!(cfg.mock_latency, Some(Duration::ZERO));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("UKS_TIMEOUT_MS", "soon")]).unwrap_err(),
            ConfigError::InvalidNumber {
                key: "UKS_TIMEOUT_MS",
                value: "soon".into()
            }
        );
        assert_eq!(
            config(&[("UKS_REFRESH_SECS", "0")]).unwrap_err(),
            ConfigError::Zero { key: "UKS_REFRESH_SECS" }
        );
        assert!(matches!(
            config(&[("UKS_BACKEND", "grpc")]),
            Err(ConfigError::InvalidMode(_))
        ));
    }
}
