use crate::geocode::{Geocoder, NominatimProvider, Throttle, NOMINATIM_SEARCH_URL};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Shortest pause allowed between geocoding requests.
pub const MIN_GEOCODER_DELAY_MS: u64 = 1000;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub geocoder: GeocoderConfig,
    pub listings_path: PathBuf,
}

impl AppConfig {
    /// Read configuration from the environment (and `.env` if present).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let listings_path = PathBuf::from(
            env::var("LISTINGS_PATH").unwrap_or_else(|_| "data/listings.csv".to_string()),
        );

        let delay_ms = parse_u64("GEOCODER_DELAY_MS", MIN_GEOCODER_DELAY_MS)?;
        if delay_ms < MIN_GEOCODER_DELAY_MS {
            return Err(ConfigError::DelayTooShort { delay_ms });
        }
        let timeout_secs = parse_u64("GEOCODER_TIMEOUT_SECS", 10)?;

        let geocoder = GeocoderConfig {
            url: env::var("GEOCODER_URL").unwrap_or_else(|_| NOMINATIM_SEARCH_URL.to_string()),
            user_agent: env::var("GEOCODER_USER_AGENT").unwrap_or_else(|_| {
                format!("property-finder/{}", env!("CARGO_PKG_VERSION"))
            }),
            delay: Duration::from_millis(delay_ms),
            timeout: Duration::from_secs(timeout_secs),
            country: match env::var("GEOCODER_COUNTRY") {
                Ok(value) if value.trim().is_empty() => None,
                Ok(value) => Some(value.trim().to_string()),
                Err(_) => Some("Israel".to_string()),
            },
            country_codes: optional_var("GEOCODER_COUNTRY_CODES"),
        };

        Ok(Self {
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            geocoder,
            listings_path,
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        None => Ok(default),
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

/// Where and how addresses get geocoded.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub url: String,
    pub user_agent: String,
    pub delay: Duration,
    pub timeout: Duration,
    /// Appended to every listing address, e.g. "Israel". Set the variable to
    /// an empty string to send addresses as-is.
    pub country: Option<String>,
    pub country_codes: Option<String>,
}

impl GeocoderConfig {
    /// Build the process-wide geocoder backed by Nominatim.
    pub fn build(&self) -> Geocoder {
        let provider = NominatimProvider::new(&self.url, &self.user_agent)
            .with_timeout(self.timeout)
            .with_country_codes(self.country_codes.clone());
        Geocoder::new(Box::new(provider), Throttle::new(self.delay))
            .with_country(self.country.clone())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("GEOCODER_DELAY_MS must be at least {min} ms, got {delay_ms}", min = MIN_GEOCODER_DELAY_MS)]
    DelayTooShort { delay_ms: u64 },
}
