//! # Configuration DTO
//!
//! Maps the TOML configuration file onto plain data. Missing keys stay
//! `None`; defaults and environment overrides are applied by the bootstrap
//! layer, not here.

use std::path::PathBuf;

/// Application configuration as read from disk (pure data, no logic).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// `[service] base_url`: root of the reward service API.
    pub service_base_url: Option<String>,

    /// `[service] api_key`: bearer token sent with every request.
    pub service_api_key: Option<String>,

    /// `[service] timeout_secs`
    pub service_timeout_secs: Option<u64>,

    /// `[claim] duration_ms`
    pub claim_duration_ms: Option<u64>,

    /// `[claim] tick_ms`
    pub claim_tick_ms: Option<u64>,

    /// `[claim] settle_ms`
    pub claim_settle_ms: Option<u64>,

    /// `[storage] session_file`
    pub session_file: Option<PathBuf>,
}

impl AppConfig {
    /// Create AppConfig from a parsed TOML document.
    ///
    /// Values of the wrong type are treated as absent.
    pub fn from_toml(toml_value: &toml::Value) -> Self {
        let get = |section: &str, key: &str| -> Option<&toml::Value> {
            toml_value.get(section).and_then(|s| s.get(key))
        };
        let get_str = |section: &str, key: &str| -> Option<String> {
            get(section, key).and_then(|v| v.as_str()).map(str::to_string)
        };
        let get_u64 = |section: &str, key: &str| -> Option<u64> {
            get(section, key)
                .and_then(|v| v.as_integer())
                .and_then(|v| u64::try_from(v).ok())
        };

        Self {
            service_base_url: get_str("service", "base_url"),
            service_api_key: get_str("service", "api_key"),
            service_timeout_secs: get_u64("service", "timeout_secs"),
            claim_duration_ms: get_u64("claim", "duration_ms"),
            claim_tick_ms: get_u64("claim", "tick_ms"),
            claim_settle_ms: get_u64("claim", "settle_ms"),
            session_file: get_str("storage", "session_file").map(PathBuf::from),
        }
    }
}
