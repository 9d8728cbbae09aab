use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_BASE_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";
const DEFAULT_PAGE_SIZE: usize = 25;
const APP_DIR: &str = "snooze-cli";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub base_url: Option<String>,
    pub page_size: Option<usize>,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub base_url: String,
    pub page_size: usize,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

impl From<AppConfig> for RuntimeConfig {
    fn from(c: AppConfig) -> Self {
        Self {
            base_url: c.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            page_size: c.page_size.filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_SIZE),
            open_command: c.open_command,
            header: c.header,
        }
    }
}

pub fn load(config_override: Option<String>, api_override: Option<String>) -> Result<RuntimeConfig> {
    let parsed = match config_override {
        Some(path_str) => read_file(Path::new(&path_str))?,
        None => match config_dir().map(|d| d.join("config.toml")) {
            Some(path) if path.is_file() => read_file(&path)?,
            _ => AppConfig::default(),
        },
    };

    let mut cfg = RuntimeConfig::from(parsed);
    if let Some(url) = api_override {
        cfg.base_url = url;
    }
    Ok(cfg)
}

fn read_file(path: &Path) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

/// `$XDG_CONFIG_HOME/snooze-cli`, else `~/.config/snooze-cli`.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join(APP_DIR));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(
            &path,
            "base_url = \"http://localhost:5000\"\npage_size = 10\nheader = \"HN-ish\"\n",
        )
        .unwrap();
        let cfg = load(Some(path.display().to_string()), None).unwrap();
        assert_eq!(cfg.base_url, "http://localhost:5000");
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.header.as_deref(), Some("HN-ish"));
    }

    #[test]
    fn api_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "base_url = \"http://file\"\n").unwrap();
        let cfg = load(Some(path.display().to_string()), Some("http://flag".into())).unwrap();
        assert_eq!(cfg.base_url, "http://flag");
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn zero_page_size_falls_back() {
        let cfg = RuntimeConfig::from(AppConfig {
            page_size: Some(0),
            ..Default::default()
        });
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(load(Some("/definitely/not/here.toml".into()), None).is_err());
    }
}
