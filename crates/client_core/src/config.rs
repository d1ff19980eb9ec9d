use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const SETTINGS_FILE: &str = "acronyms.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request timeout must be at least one second")]
    InvalidTimeout,
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let parsed = Url::parse(self.base_url.trim()).map_err(|e| SettingsError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SettingsError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if parsed.host_str().is_none() {
            return Err(SettingsError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "missing host".into(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::InvalidTimeout);
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for `format!("{base}{path}")`.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim().trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Loads [`SETTINGS_FILE`] from the working directory, then applies environment overrides.
pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, SettingsError> {
    let mut settings = if path.exists() {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str::<ClientSettings>(&raw).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?
    } else {
        ClientSettings::default()
    };

    apply_env_overrides(&mut settings, env);
    settings.validate()?;
    Ok(settings)
}

fn apply_env_overrides(settings: &mut ClientSettings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("ACRONYMS_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring unparsable APP__REQUEST_TIMEOUT_SECS"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
