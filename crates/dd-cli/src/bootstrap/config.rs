//! # Configuration Loader
//!
//! `load_config` only reads and maps the TOML file. Defaults, environment
//! overrides and validation happen in `resolve_settings`, the one place that
//! turns facts from the file into values the application runs with.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use dd_app::app_paths::AppPaths;
use dd_core::claim::ClaimTiming;
use dd_core::config::AppConfig;
use dd_core::security::SecretString;
use dd_infra::http::DEFAULT_TIMEOUT;

pub const BASE_URL_ENV: &str = "DAILYDROP_BASE_URL";
pub const API_KEY_ENV: &str = "DAILYDROP_API_KEY";

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config as TOML: {}", config_path.display()))?;
    Ok(AppConfig::from_toml(&toml_value))
}

/// Like [`load_config`], but a missing file means an empty configuration.
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        return Ok(AppConfig::default());
    }
    load_config(config_path)
}

/// Values taken from the process environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvOverrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|value| !value.trim().is_empty());
        Self {
            base_url: read(BASE_URL_ENV),
            api_key: read(API_KEY_ENV),
        }
    }
}

/// Everything the application needs to start, fully resolved.
#[derive(Debug)]
pub struct RuntimeSettings {
    pub base_url: String,
    pub api_key: SecretString,
    pub timeout: Duration,
    pub claim_timing: ClaimTiming,
    pub session_file: PathBuf,
}

/// Apply defaults and environment overrides to the file configuration.
///
/// Environment values win over the file.
pub fn resolve_settings(
    config: AppConfig,
    env: EnvOverrides,
    paths: &AppPaths,
) -> anyhow::Result<RuntimeSettings> {
    let Some(base_url) = env
        .base_url
        .or(config.service_base_url)
        .filter(|url| !url.trim().is_empty())
    else {
        bail!("no reward service configured: set [service] base_url or {BASE_URL_ENV}");
    };
    let api_key = env.api_key.or(config.service_api_key).unwrap_or_default();

    let defaults = ClaimTiming::default();
    let claim_timing = ClaimTiming {
        total: config
            .claim_duration_ms
            .map_or(defaults.total, Duration::from_millis),
        tick: config
            .claim_tick_ms
            .map_or(defaults.tick, Duration::from_millis),
        settle: config
            .claim_settle_ms
            .map_or(defaults.settle, Duration::from_millis),
    };
    if claim_timing.tick.is_zero() {
        bail!("[claim] tick_ms must be greater than zero");
    }

    let timeout = match config.service_timeout_secs {
        Some(0) => bail!("[service] timeout_secs must be greater than zero"),
        Some(secs) => Duration::from_secs(secs),
        None => DEFAULT_TIMEOUT,
    };

    Ok(RuntimeSettings {
        base_url: base_url.trim().to_string(),
        api_key: SecretString::new(api_key),
        timeout,
        claim_timing,
        session_file: config
            .session_file
            .unwrap_or_else(|| paths.session_file.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn paths() -> AppPaths {
        AppPaths {
            session_file: PathBuf::from("/data/dailydrop/session.json"),
            config_file: PathBuf::from("/config/dailydrop/config.toml"),
            logs_dir: PathBuf::from("/data/dailydrop/logs"),
        }
    }

    #[test]
    fn test_load_config_reads_valid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
                [service]
                base_url = "https://rewards.example.com/v1"
                timeout_secs = 20

                [claim]
                duration_ms = 2000
                "#,
            )
            .unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(
            config.service_base_url.as_deref(),
            Some("https://rewards.example.com/v1")
        );
        assert_eq!(config.service_timeout_secs, Some(20));
        assert_eq!(config.claim_duration_ms, Some(2000));
        assert_eq!(config.session_file, None);
    }

    #[test]
    fn test_load_config_reports_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[service\nbase_url = ").unwrap();

        let err = load_config(temp_file.path()).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config as TOML"));
    }

    #[test]
    fn test_missing_file_is_error_for_load_and_default_for_optional_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(load_config(&path).is_err());
        assert_eq!(load_config_or_default(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let config = AppConfig {
            service_base_url: Some("https://rewards.example.com/v1".into()),
            ..AppConfig::default()
        };

        let settings = resolve_settings(config, EnvOverrides::default(), &paths()).unwrap();

        assert_eq!(settings.base_url, "https://rewards.example.com/v1");
        assert!(settings.api_key.is_empty());
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
        assert_eq!(settings.claim_timing, ClaimTiming::default());
        assert_eq!(settings.session_file, paths().session_file);
    }

    #[test]
    fn test_resolve_prefers_environment() {
        let config = AppConfig {
            service_base_url: Some("https://file.example.com".into()),
            service_api_key: Some("file-key".into()),
            session_file: Some(PathBuf::from("/elsewhere/session.json")),
            claim_tick_ms: Some(25),
            ..AppConfig::default()
        };
        let env = EnvOverrides {
            base_url: Some("https://env.example.com".into()),
            api_key: Some("env-key".into()),
        };

        let settings = resolve_settings(config, env, &paths()).unwrap();

        assert_eq!(settings.base_url, "https://env.example.com");
        assert_eq!(settings.api_key.expose(), "env-key");
        assert_eq!(settings.claim_timing.tick, Duration::from_millis(25));
        assert_eq!(settings.session_file, PathBuf::from("/elsewhere/session.json"));
    }

    #[test]
    fn test_resolve_requires_base_url() {
        let err = resolve_settings(AppConfig::default(), EnvOverrides::default(), &paths())
            .unwrap_err();
        assert!(err.to_string().contains(BASE_URL_ENV));
    }

    #[test]
    fn test_resolve_rejects_zero_tick() {
        let config = AppConfig {
            service_base_url: Some("https://rewards.example.com".into()),
            claim_tick_ms: Some(0),
            ..AppConfig::default()
        };
        assert!(resolve_settings(config, EnvOverrides::default(), &paths()).is_err());
    }
}
