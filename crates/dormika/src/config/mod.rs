use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use chrono::Duration;

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
    pub dorm: DormConfig,
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

        let dorm = DormConfig {
            name: env::var("DORM_NAME").unwrap_or_else(|_| "DormiKa".to_string()),
            hold_hours: parse_var("DORM_HOLD_HOURS", 48)?,
            office_open_hour: parse_var("DORM_OFFICE_OPEN_HOUR", 8)?,
            office_close_hour: parse_var("DORM_OFFICE_CLOSE_HOUR", 17)?,
            hold_sweep_secs: parse_var("DORM_HOLD_SWEEP_SECS", 300)?,
            seed_demo: parse_var("DORM_SEED_DEMO", true)?,
        };
        dorm.validate()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            dorm,
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Operating rules for the dormitory workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DormConfig {
    pub name: String,
    /// How long a requested room stays reserved before it is released again.
    pub hold_hours: i64,
    /// First hour (inclusive) at which the office accepts room booking requests.
    pub office_open_hour: u32,
    /// Last hour (inclusive) at which the office accepts room booking requests.
    pub office_close_hour: u32,
    pub hold_sweep_secs: u64,
    pub seed_demo: bool,
}

impl DormConfig {
    pub fn hold_duration(&self) -> Duration {
        Duration::hours(self.hold_hours)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hold_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "DORM_HOLD_HOURS",
                value: self.hold_hours.to_string(),
            });
        }
        if self.hold_sweep_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DORM_HOLD_SWEEP_SECS",
                value: "0".to_string(),
            });
        }
        if self.office_open_hour > self.office_close_hour || self.office_close_hour > 23 {
            return Err(ConfigError::InvalidOfficeHours {
                open: self.office_open_hour,
                close: self.office_close_hour,
            });
        }
        Ok(())
    }
}

impl Default for DormConfig {
    fn default() -> Self {
        Self {
            name: "DormiKa".to_string(),
            hold_hours: 48,
            office_open_hour: 8,
            office_close_hour: 17,
            hold_sweep_secs: 300,
            seed_demo: true,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str, value: String },
    InvalidOfficeHours { open: u32, close: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an invalid value '{value}'")
            }
            ConfigError::InvalidOfficeHours { open, close } => write!(
                f,
                "office hours {open}..={close} are invalid; expected open <= close <= 23"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidValue { .. }
            | ConfigError::InvalidOfficeHours { .. } => None,
        }
    }
}
