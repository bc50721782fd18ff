use std::{collections::HashMap, fs, time::Duration};

use anyhow::{anyhow, Context, Result};
use url::Url;

use crate::poller::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Defaults, then `client.toml` in the working directory, then the environment.
pub fn load_settings() -> Result<ClientSettings> {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file {
        let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)
            .with_context(|| format!("failed to parse {SETTINGS_FILE}"))?;
        if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
            settings.api_base_url = v.to_string();
        }
        if let Some(v) = file_cfg
            .get("poll_interval_secs")
            .and_then(toml::Value::as_integer)
        {
            settings.poll_interval = poll_interval_from_secs(v)?;
        }
    }

    if let Some(v) = env("HR_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__POLL_INTERVAL_SECS") {
        let secs = v
            .trim()
            .parse::<i64>()
            .with_context(|| format!("APP__POLL_INTERVAL_SECS is not a number: {v}"))?;
        settings.poll_interval = poll_interval_from_secs(secs)?;
    }

    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    Ok(settings)
}

pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let parsed = Url::parse(trimmed).with_context(|| format!("invalid api base url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "api base url must use http or https, got '{}'",
            parsed.scheme()
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn poll_interval_from_secs(secs: i64) -> Result<Duration> {
    if secs <= 0 {
        return Err(anyhow!("poll interval must be positive, got {secs}"));
    }
    Ok(Duration::from_secs(secs.unsigned_abs()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
