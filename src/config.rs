use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "https://toil.kitemaker.co";
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub kitemaker: Option<KitemakerConfig>,
    pub consolidate: Option<ConsolidateConfig>,
}

#[derive(Debug, Deserialize, Default)]
pub struct KitemakerConfig {
    pub token: Option<String>,
    pub host: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConsolidateConfig {
    pub page_size: Option<usize>,
    pub keep_going: Option<bool>,
    pub journal: Option<bool>,
}

/// Values from the environment, which take precedence over the config file.
#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub token: Option<String>,
    pub host: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            token: std::env::var("KITEMAKER_TOKEN").ok(),
            host: std::env::var("KITEMAKER_HOST").ok(),
        }
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub host: String,
    pub page_size: usize,
    pub keep_going: bool,
    pub journal: bool,
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kite-consolidate")
}

pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

impl AppConfig {
    /// Merge file values with environment overrides. Blank strings count as unset.
    pub fn resolve(&self, env: EnvOverrides) -> Result<Settings, ConfigError> {
        let file = self.kitemaker.as_ref();
        let consolidate = self.consolidate.as_ref();

        let token = non_blank(env.token)
            .or_else(|| non_blank(file.and_then(|k| k.token.clone())))
            .ok_or_else(|| ConfigError::MissingToken(config_path().display().to_string()))?;

        let host = non_blank(env.host)
            .or_else(|| non_blank(file.and_then(|k| k.host.clone())))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let page_size = consolidate
            .and_then(|c| c.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        Ok(Settings {
            token,
            host,
            page_size,
            keep_going: consolidate.and_then(|c| c.keep_going).unwrap_or(false),
            journal: consolidate.and_then(|c| c.journal).unwrap_or(true),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(token: Option<&str>, host: Option<&str>) -> EnvOverrides {
        EnvOverrides {
            token: token.map(String::from),
            host: host.map(String::from),
        }
    }

    #[test]
    fn missing_file_yields_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert!(config.kitemaker.is_none());
        assert!(config.consolidate.is_none());
    }

    #[test]
    fn parses_full_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[kitemaker]
token = "file-token"
host = "https://example.kitemaker.co"

[consolidate]
page_size = 25
keep_going = true
journal = false
"#,
        )
        .unwrap();

        let settings = load_config_from(&path)
            .unwrap()
            .resolve(env(None, None))
            .unwrap();
        assert_eq!(settings.token, "file-token");
        assert_eq!(settings.host, "https://example.kitemaker.co");
        assert_eq!(settings.page_size, 25);
        assert!(settings.keep_going);
        assert!(!settings.journal);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[kitemaker\ntoken = ").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn environment_overrides_file() {
        let config = AppConfig {
            kitemaker: Some(KitemakerConfig {
                token: Some("file-token".into()),
                host: Some("https://file.example".into()),
            }),
            consolidate: None,
        };
        let settings = config
            .resolve(env(Some("env-token"), Some("https://env.example")))
            .unwrap();
        assert_eq!(settings.token, "env-token");
        assert_eq!(settings.host, "https://env.example");
    }

    #[test]
    fn defaults_apply_without_file() {
        let settings = AppConfig::default()
            .resolve(env(Some("tok"), None))
            .unwrap();
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert!(!settings.keep_going);
        assert!(settings.journal);
    }

    #[test]
    fn blank_token_is_rejected() {
        let err = AppConfig::default()
            .resolve(env(Some("   "), None))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken(_)));
    }

    #[test]
    fn blank_env_token_falls_back_to_file() {
        let config = AppConfig {
            kitemaker: Some(KitemakerConfig {
                token: Some("file-token".into()),
                host: None,
            }),
            consolidate: None,
        };
        let settings = config.resolve(env(Some(""), None)).unwrap();
        assert_eq!(settings.token, "file-token");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config = AppConfig {
            kitemaker: None,
            consolidate: Some(ConsolidateConfig {
                page_size: Some(0),
                ..Default::default()
            }),
        };
        let err = config.resolve(env(Some("tok"), None)).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroPageSize));
    }
}
