use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "HealthAssist";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Days before expiry at which an ExpiryWarning is raised.
pub const DEFAULT_EXPIRY_THRESHOLD_DAYS: u32 = 14;

/// Quantity at or below which a LowStock alert is raised.
pub const DEFAULT_LOW_STOCK_QUANTITY: u32 = 10;

/// Default search radius for nearby facilities, in metres.
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 5000;

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "healthassist=info,tower_http=info"
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Where nearby-place lookups go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacesSource {
    /// A remote `/nearby` service at `nearby_url`.
    Remote,
    /// OpenStreetMap Overpass at `overpass_url`.
    Overpass,
}

impl std::str::FromStr for PlacesSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "overpass" => Ok(Self::Overpass),
            _ => Err(()),
        }
    }
}

/// Runtime configuration, read from `HEALTHASSIST_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub ollama_url: String,
    /// `None` disables the AI assistant; chat then answers with the
    /// "unavailable" notice.
    pub ollama_model: Option<String>,
    pub ai_timeout: Duration,
    pub symptom_url: String,
    pub places_source: PlacesSource,
    pub nearby_url: String,
    pub overpass_url: String,
    pub nominatim_url: String,
    pub http_timeout: Duration,
    pub connect_timeout: Duration,
    pub rate_per_minute: u32,
    pub rate_per_hour: u32,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            ollama_url: "http://localhost:11434".into(),
            ollama_model: Some("medgemma".into()),
            ai_timeout: Duration::from_secs(120),
            symptom_url: "http://localhost:5000/api/predict-symptoms".into(),
            places_source: PlacesSource::Remote,
            nearby_url: "http://localhost:8000/nearby".into(),
            overpass_url: "https://overpass-api.de/api/interpreter".into(),
            nominatim_url: "https://nominatim.openstreetmap.org/search".into(),
            http_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            rate_per_minute: 100,
            rate_per_hour: 1000,
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    /// Unset keys keep their defaults; set but malformed keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("HEALTHASSIST_BIND") {
            config.bind_addr = parse("HEALTHASSIST_BIND", &v)?;
        }
        if let Some(v) = lookup("HEALTHASSIST_OLLAMA_URL") {
            config.ollama_url = v;
        }
        if let Some(v) = lookup("HEALTHASSIST_OLLAMA_MODEL") {
            let v = v.trim();
            config.ollama_model = (!v.is_empty()).then(|| v.to_string());
        }
        if let Some(v) = lookup("HEALTHASSIST_AI_TIMEOUT_SECS") {
            config.ai_timeout = Duration::from_secs(parse("HEALTHASSIST_AI_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("HEALTHASSIST_SYMPTOM_URL") {
            config.symptom_url = v;
        }
        if let Some(v) = lookup("HEALTHASSIST_PLACES_SOURCE") {
            config.places_source = parse("HEALTHASSIST_PLACES_SOURCE", &v)?;
        }
        if let Some(v) = lookup("HEALTHASSIST_NEARBY_URL") {
            config.nearby_url = v;
        }
        if let Some(v) = lookup("HEALTHASSIST_OVERPASS_URL") {
            config.overpass_url = v;
        }
        if let Some(v) = lookup("HEALTHASSIST_NOMINATIM_URL") {
            config.nominatim_url = v;
        }
        if let Some(v) = lookup("HEALTHASSIST_HTTP_TIMEOUT_SECS") {
            config.http_timeout =
                Duration::from_secs(parse("HEALTHASSIST_HTTP_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("HEALTHASSIST_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout =
                Duration::from_secs(parse("HEALTHASSIST_CONNECT_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("HEALTHASSIST_RATE_PER_MINUTE") {
            config.rate_per_minute = parse("HEALTHASSIST_RATE_PER_MINUTE", &v)?;
        }
        if let Some(v) = lookup("HEALTHASSIST_RATE_PER_HOUR") {
            config.rate_per_hour = parse("HEALTHASSIST_RATE_PER_HOUR", &v)?;
        }
        if let Some(v) = lookup("HEALTHASSIST_SEED_DEMO") {
            config.seed_demo_data = parse_bool("HEALTHASSIST_SEED_DEMO", &v)?;
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_name_is_healthassist() {
        assert_eq!(APP_NAME, "HealthAssist");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn empty_environment_keeps_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.ollama_model.as_deref(), Some("medgemma"));
        assert_eq!(config.rate_per_minute, 100);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HEALTHASSIST_BIND", "0.0.0.0:9000"),
            ("HEALTHASSIST_AI_TIMEOUT_SECS", "45"),
            ("HEALTHASSIST_SEED_DEMO", "off"),
            ("HEALTHASSIST_NEARBY_URL", "http://places.local/nearby"),
            ("HEALTHASSIST_PLACES_SOURCE", "Overpass"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.ai_timeout, Duration::from_secs(45));
        assert!(!config.seed_demo_data);
        assert_eq!(config.nearby_url, "http://places.local/nearby");
        assert_eq!(config.places_source, PlacesSource::Overpass);
    }

    #[test]
    fn blank_model_disables_assistant() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("HEALTHASSIST_OLLAMA_MODEL", "  ")])).unwrap();
        assert!(config.ollama_model.is_none());
    }

    #[test]
    fn malformed_value_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("HEALTHASSIST_RATE_PER_HOUR", "lots")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "HEALTHASSIST_RATE_PER_HOUR",
                value: "lots".into(),
            }
        );
    }
}
