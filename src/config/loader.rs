//! Configuration loading from a TOML file and the process environment.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{CmsMode, GatewayConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Names the optional TOML file used as the base layer.
pub const CONFIG_PATH_VAR: &str = "GATEWAY_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML configuration file. Missing sections fall back to defaults.
pub fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load configuration the way the binary does: `.env` file (if any), optional
/// TOML base named by `GATEWAY_CONFIG`, then environment overrides.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    // A missing .env file is the normal case in containers.
    let _ = dotenvy::dotenv();
    let vars: HashMap<String, String> = std::env::vars().collect();
    load_from_vars(&vars)
}

/// Build and validate configuration from an explicit variable map.
pub fn load_from_vars(vars: &HashMap<String, String>) -> Result<GatewayConfig, ConfigError> {
    let base = match lookup(vars, CONFIG_PATH_VAR) {
        Some(path) => read_config_file(Path::new(path))?,
        None => GatewayConfig::default(),
    };

    let config = apply_env(base, vars).map_err(ConfigError::Validation)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay environment variables on top of `config`. Empty values are unset.
fn apply_env(
    mut config: GatewayConfig,
    vars: &HashMap<String, String>,
) -> Result<GatewayConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(host) = lookup(vars, "HOST") {
        config.listener.host = host.to_string();
    }
    if let Some(port) = parse_var::<u16>(vars, "PORT", &mut errors) {
        config.listener.port = port;
    }

    if let Some(mode) = parse_var::<CmsMode>(vars, "CMS_MODE", &mut errors) {
        config.cms.mode = mode;
    }
    if let Some(url) = parse_var::<Url>(vars, "CMS_ENDPOINT", &mut errors) {
        config.cms.endpoint = Some(url);
    }
    if let Some(url) = parse_var::<Url>(vars, "CMS_HERO_ENDPOINT", &mut errors) {
        config.cms.hero_endpoint = Some(url);
    }
    if let Some(auth) = lookup(vars, "CMS_AUTH_HEADER") {
        config.cms.auth_header = Some(auth.to_string());
    }
    if let Some(url) = parse_var::<Url>(vars, "PRODUCTS_API_URL", &mut errors) {
        config.catalog.products_url = Some(url);
    }

    if let Some(key) = lookup(vars, "API_KEY") {
        config.security.api_key = Some(key.to_string());
    }
    if let Some(origin) = lookup(vars, "CORS_ORIGIN") {
        config.security.cors_origin = origin.to_string();
    }
    if let Some(enabled) = parse_var::<bool>(vars, "SECURITY_HEADERS", &mut errors) {
        config.security.enable_headers = enabled;
    }

    if let Some(enabled) = parse_var::<bool>(vars, "RATE_LIMIT_ENABLED", &mut errors) {
        config.rate_limit.enabled = enabled;
    }
    if let Some(max) = parse_var::<u64>(vars, "RATE_LIMIT_MAX", &mut errors) {
        config.rate_limit.max_requests = max;
    }
    if let Some(window) = parse_var::<u64>(vars, "RATE_LIMIT_WINDOW_SECS", &mut errors) {
        config.rate_limit.window_secs = window;
    }

    if let Some(secs) = parse_var::<u64>(vars, "UPSTREAM_CONNECT_TIMEOUT_SECS", &mut errors) {
        config.timeouts.connect_secs = secs;
    }
    if let Some(secs) = parse_var::<u64>(vars, "UPSTREAM_TIMEOUT_SECS", &mut errors) {
        config.timeouts.upstream_secs = secs;
    }
    if let Some(secs) = parse_var::<u64>(vars, "REQUEST_TIMEOUT_SECS", &mut errors) {
        config.timeouts.request_secs = secs;
    }

    if let Some(level) = lookup(vars, "LOG_LEVEL") {
        config.observability.log_level = level.to_string();
    }
    match lookup(vars, "LOG_FORMAT") {
        Some("json") => config.observability.log_format = LogFormat::Json,
        Some("text") => config.observability.log_format = LogFormat::Text,
        Some(other) => errors.push(ValidationError::new(
            "LOG_FORMAT",
            format!("expected 'text' or 'json', got '{}'", other),
        )),
        None => {}
    }
    if let Some(addr) = lookup(vars, "METRICS_ADDRESS") {
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = addr.to_string();
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}

fn lookup<'a>(vars: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    vars.get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_var<T>(
    vars: &HashMap<String, String>,
    name: &'static str,
    errors: &mut Vec<ValidationError>,
) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(vars, name)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(ValidationError::new(name, format!("invalid value '{}': {}", raw, e)));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = load_from_vars(&vars(&[
            ("PORT", "8088"),
            ("CMS_MODE", "GRAPHQL_POST"),
            ("CMS_ENDPOINT", "https://cms.example.com/graphql"),
            ("API_KEY", "secret"),
            ("PRODUCTS_API_URL", "http://catalog.internal/products"),
        ]))
        .unwrap();

        assert_eq!(config.listener.port, 8088);
        assert_eq!(config.cms.mode, CmsMode::GraphqlPost);
        assert_eq!(config.security.api_key.as_deref(), Some("secret"));
        assert!(config.catalog.products_url.is_some());
        assert!(config.cms.hero_endpoint.is_none());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = load_from_vars(&vars(&[
            ("CMS_ENDPOINT", ""),
            ("API_KEY", "  "),
            ("PORT", ""),
        ]))
        .unwrap();

        assert!(config.cms.endpoint.is_none());
        assert!(config.security.api_key.is_none());
        assert_eq!(config.listener.port, 4001);
    }

    #[test]
    fn test_reports_every_bad_variable() {
        let err = load_from_vars(&vars(&[
            ("PORT", "eighty"),
            ("CMS_HERO_ENDPOINT", "not a url"),
            ("CMS_MODE", "SOAP"),
        ]))
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["PORT", "CMS_MODE", "CMS_HERO_ENDPOINT"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_metrics_address_enables_metrics() {
        let config = load_from_vars(&vars(&[("METRICS_ADDRESS", "127.0.0.1:9191")])).unwrap();
        assert!(config.observability.metrics_enabled);
        assert_eq!(config.observability.metrics_address, "127.0.0.1:9191");
    }

    #[test]
    fn test_toml_base_layer() {
        let path = std::env::temp_dir().join(format!("content-gateway-{}.toml", std::process::id()));
        fs::write(
            &path,
            "[security]\ncors_origin = \"https://shop.example.com\"\n[listener]\nport = 7000\n",
        )
        .unwrap();

        let config = load_from_vars(&vars(&[
            (CONFIG_PATH_VAR, path.to_str().unwrap()),
            ("PORT", "7001"),
        ]))
        .unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(config.security.cors_origin, "https://shop.example.com");
        assert_eq!(config.listener.port, 7001);
    }
}
