use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::allocation::{ScoringWeights, WeightError};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the allocation service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub weights: ScoringWeights,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let weights = load_weights()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            weights,
        })
    }
}

/// Scoring weights come from the environment so admins can retune the split
/// without a rebuild; each variable falls back to the published default.
fn load_weights() -> Result<ScoringWeights, ConfigError> {
    let defaults = ScoringWeights::default();

    let weights = ScoringWeights {
        rating: weight_var("ALLOC_WEIGHT_RATING", defaults.rating)?,
        engagement: weight_var("ALLOC_WEIGHT_ENGAGEMENT", defaults.engagement)?,
        impact: weight_var("ALLOC_WEIGHT_IMPACT", defaults.impact)?,
        reporting: weight_var("ALLOC_WEIGHT_REPORTING", defaults.reporting)?,
        profile: weight_var("ALLOC_WEIGHT_PROFILE", defaults.profile)?,
    };

    weights
        .validated()
        .map_err(|source| ConfigError::InvalidWeights { source })
}

fn weight_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidWeight { variable: name }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeight { variable: &'static str },
    InvalidWeights { source: WeightError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeight { variable } => {
                write!(f, "{variable} must be a decimal number")
            }
            ConfigError::InvalidWeights { source } => {
                write!(f, "scoring weight overrides rejected: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidWeight { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidWeights { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ALLOC_WEIGHT_RATING");
        env::remove_var("ALLOC_WEIGHT_ENGAGEMENT");
        env::remove_var("ALLOC_WEIGHT_IMPACT");
        env::remove_var("ALLOC_WEIGHT_REPORTING");
        env::remove_var("ALLOC_WEIGHT_PROFILE");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.weights, ScoringWeights::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn weight_overrides_must_keep_the_sum_at_100() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ALLOC_WEIGHT_RATING", "50");
        let err = AppConfig::load().expect_err("sum drifts to 120");
        assert!(matches!(err, ConfigError::InvalidWeights { .. }));
    }

    #[test]
    fn weight_overrides_apply_when_rebalanced() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ALLOC_WEIGHT_RATING", "40");
        env::set_var("ALLOC_WEIGHT_ENGAGEMENT", "10");
        let config = AppConfig::load().expect("rebalanced weights load");
        assert_eq!(config.weights.rating, 40.0);
        assert_eq!(config.weights.engagement, 10.0);
        assert_eq!(config.weights.impact, 20.0);
    }

    #[test]
    fn rejects_non_numeric_weight_override() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ALLOC_WEIGHT_PROFILE", "plenty");
        let err = AppConfig::load().expect_err("non-numeric override");
        assert!(matches!(
            err,
            ConfigError::InvalidWeight {
                variable: "ALLOC_WEIGHT_PROFILE"
            }
        ));
    }
}
