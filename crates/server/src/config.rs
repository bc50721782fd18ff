use std::{collections::HashMap, fs};

use anyhow::{anyhow, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub default_meeting_link: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            default_meeting_link: "https://meet.google.com/placeholder".into(),
            max_body_bytes: 64 * 1024,
        }
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let file = fs::read_to_string("server.toml").ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)
            .context("failed to parse server.toml")?;
        if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
            settings.server_bind = v.to_string();
        }
        if let Some(v) = file_cfg
            .get("default_meeting_link")
            .and_then(toml::Value::as_str)
        {
            settings.default_meeting_link = v.to_string();
        }
        if let Some(v) = file_cfg.get("max_body_bytes") {
            let bytes = v
                .as_integer()
                .and_then(|bytes| usize::try_from(bytes).ok())
                .ok_or_else(|| anyhow!("max_body_bytes must be a non-negative integer, got {v}"))?;
            settings.max_body_bytes = bytes;
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__DEFAULT_MEETING_LINK") {
        settings.default_meeting_link = v;
    }

    if let Some(v) = env("APP__MAX_BODY_BYTES") {
        settings.max_body_bytes = v
            .parse::<usize>()
            .with_context(|| format!("APP__MAX_BODY_BYTES is not a number: {v}"))?;
    }

    validate_meeting_link(&settings.default_meeting_link)?;
    Ok(settings)
}

fn validate_meeting_link(link: &str) -> anyhow::Result<()> {
    let parsed = url::Url::parse(link)
        .with_context(|| format!("default meeting link '{link}' is not a valid url"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!("default meeting link must be http(s), got '{link}'"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
