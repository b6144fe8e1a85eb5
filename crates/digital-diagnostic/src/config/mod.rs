use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub diagnostic: DiagnosticConfig,
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

        let results_path = env::var("APP_RESULTS_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let admin_token = env::var("APP_ADMIN_TOKEN")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let retain_answers_on_back = match env::var("APP_RETAIN_ANSWERS_ON_BACK") {
            Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag {
                name: "APP_RETAIN_ANSWERS_ON_BACK",
                value,
            })?,
            Err(_) => true,
        };

        let session_ttl = seconds_var("APP_SESSION_TTL_SECS", 60 * 60)?;
        let completed_session_ttl = seconds_var("APP_COMPLETED_SESSION_TTL_SECS", 15 * 60)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig { results_path },
            admin: AdminConfig { token: admin_token },
            diagnostic: DiagnosticConfig {
                retain_answers_on_back,
                session_ttl,
                completed_session_ttl,
            },
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn seconds_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidDuration { name, value }),
        Err(_) => Ok(Duration::from_secs(default)),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where completed results are kept; in memory when no path is set.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub results_path: Option<PathBuf>,
}

#[derive(Clone, Default)]
pub struct AdminConfig {
    pub token: Option<String>,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticConfig {
    /// Keep later answers when a respondent steps back.
    pub retain_answers_on_back: bool,
    /// Idle time after which an unfinished session is dropped.
    pub session_ttl: Duration,
    /// Idle time after which a completed session is dropped.
    pub completed_session_ttl: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { name: &'static str, value: String },
    InvalidDuration { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
            ConfigError::InvalidDuration { name, value } => {
                write!(f, "{name} must be a whole number of seconds, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidDuration { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
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
        env::remove_var("APP_RESULTS_PATH");
        env::remove_var("APP_ADMIN_TOKEN");
        env::remove_var("APP_RETAIN_ANSWERS_ON_BACK");
        env::remove_var("APP_SESSION_TTL_SECS");
        env::remove_var("APP_COMPLETED_SESSION_TTL_SECS");
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
        assert!(config.storage.results_path.is_none());
        assert!(config.admin.token.is_none());
        assert!(config.diagnostic.retain_answers_on_back);
        assert_eq!(config.diagnostic.session_ttl, Duration::from_secs(3600));
        assert_eq!(config.diagnostic.completed_session_ttl, Duration::from_secs(900));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_storage_admin_and_step_back_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_RESULTS_PATH", "/var/lib/diagnostic/results.json");
        env::set_var("APP_ADMIN_TOKEN", "s3cret");
        env::set_var("APP_RETAIN_ANSWERS_ON_BACK", "off");

        let config = AppConfig::load().expect("config loads");

        assert_eq!(
            config.storage.results_path,
            Some(PathBuf::from("/var/lib/diagnostic/results.json"))
        );
        assert_eq!(config.admin.token.as_deref(), Some("s3cret"));
        assert!(!format!("{:?}", config.admin).contains("s3cret"));
        assert!(!config.diagnostic.retain_answers_on_back);
        reset_env();
    }

    #[test]
    fn rejects_malformed_port_and_flags() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "http");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidPort)));

        reset_env();
        env::set_var("APP_RETAIN_ANSWERS_ON_BACK", "maybe");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag { value, .. }) if value == "maybe"
        ));
        reset_env();
    }

    #[test]
    fn reads_session_lifetimes_in_seconds() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SESSION_TTL_SECS", "120");
        env::set_var("APP_COMPLETED_SESSION_TTL_SECS", " 30 ");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.diagnostic.session_ttl, Duration::from_secs(120));
        assert_eq!(config.diagnostic.completed_session_ttl, Duration::from_secs(30));

        env::set_var("APP_SESSION_TTL_SECS", "1h");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidDuration { name: "APP_SESSION_TTL_SECS", value }) if value == "1h"
        ));
        reset_env();
    }
}
