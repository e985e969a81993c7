use std::{collections::HashMap, fs, path::Path};

use thiserror::Error;
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE: &str = "customers.toml";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_CUSTOMERS_PATH: &str = "/api/customers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub customers_path: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            customers_path: DEFAULT_CUSTOMERS_PATH.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid customers endpoint url `{value}`: {source}")]
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("customers endpoint `{0}` must use http or https")]
    UnsupportedScheme(String),
}

impl ClientSettings {
    /// Full URL of the customers collection endpoint.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let value = join_endpoint(&self.api_base_url, &self.customers_path);
        let url = Url::parse(&value).map_err(|source| ConfigError::InvalidUrl {
            value: value.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(value));
        }
        Ok(url)
    }
}

/// Defaults, then `customers.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, env);

    settings
}

pub(crate) fn apply_file_overrides(settings: &mut ClientSettings, raw: &str) {
    match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("customers_path") {
                settings.customers_path = v.clone();
            }
        }
        Err(err) => warn!(error = %err, "ignoring unreadable {SETTINGS_FILE}"),
    }
}

pub(crate) fn apply_env_overrides(
    settings: &mut ClientSettings,
    env: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = env("CUSTOMERS_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__CUSTOMERS_PATH") {
        settings.customers_path = v;
    }
}

pub(crate) fn join_endpoint(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
