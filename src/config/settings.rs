use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const API_URL_ENV: &str = "DOCDESK_API_URL";
pub const HOME_ENV: &str = "DOCDESK_HOME";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UiConfig {
    /// Launch the system browser for download links.
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

fn default_open_browser() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            open_browser: default_open_browser(),
        }
    }
}

impl Config {
    /// Resolve the API base URL: explicit override, then environment, then file.
    /// Blank values count as missing and a trailing `/` is dropped.
    pub fn resolve_base_url(&self, override_url: Option<&str>) -> Option<String> {
        let env_url = std::env::var(API_URL_ENV).ok();
        let url = [override_url, env_url.as_deref(), self.api.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(normalize_base_url)
            .find(|url| !url.is_empty());
        url
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub fn docdesk_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".docdesk"))
        .context("Could not find home directory")
}

pub fn state_db_path() -> Result<PathBuf> {
    Ok(docdesk_dir()?.join("state.db"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(docdesk_dir()?.join("config.toml"))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(docdesk_dir()?.join("docdesk.log"))
}

pub fn env_file() -> Result<PathBuf> {
    Ok(docdesk_dir()?.join("env"))
}

pub fn load_env_file() {
    let Ok(path) = env_file() else {
        return;
    };
    if !path.exists() {
        return;
    }
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return,
    };
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_env_file();
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse config.toml")
}

pub fn ensure_docdesk_dir() -> Result<()> {
    let dir = docdesk_dir()?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg = parse_config(
            r#"
            [api]
            base_url = "https://api.example.com/prod/"

            [ui]
            open_browser = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url.as_deref(), Some("https://api.example.com/prod/"));
        assert!(!cfg.ui.open_browser);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert!(cfg.api.base_url.is_none());
        assert!(cfg.ui.open_browser);
    }

    #[test]
    fn test_override_wins_and_trailing_slash_is_trimmed() {
        let cfg = parse_config("[api]\nbase_url = \"https://file.example.com\"").unwrap();
        assert_eq!(
            cfg.resolve_base_url(Some("https://flag.example.com/")).as_deref(),
            Some("https://flag.example.com")
        );
    }

    #[test]
    fn test_blank_override_falls_through_to_configured_url() {
        let cfg = parse_config("[api]\nbase_url = \"https://file.example.com/\"").unwrap();
        let url = cfg.resolve_base_url(Some("   ")).unwrap();
        assert!(!url.is_empty());
        assert!(!url.ends_with('/'));
    }

    #[test]
    fn test_blank_base_url_counts_as_missing() {
        assert_eq!(normalize_base_url("  /  "), "");
        assert_eq!(
            normalize_base_url(" https://api.example.com/prod// "),
            "https://api.example.com/prod"
        );
    }
}
