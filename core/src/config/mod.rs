use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const NIMBUS_DIR: &str = ".nimbus";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub weather_api_key: String,
    pub base_url: Option<String>,
    pub weather_base_url: Option<String>,
    pub model: String,
    pub max_iterations: usize,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            weather_api_key: String::new(),
            base_url: None,
            weather_base_url: None,
            model: "gpt-4o".to_string(),
            max_iterations: 20,
            server: ServerConfig::default(),
        }
    }
}

pub fn get_nimbus_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(NIMBUS_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_nimbus_dir().join("config.toml")
}

pub fn ensure_nimbus_dir() -> Result<PathBuf> {
    let nimbus_dir = get_nimbus_dir();

    if !nimbus_dir.exists() {
        std::fs::create_dir_all(&nimbus_dir).with_context(|| {
            format!(
                "Failed to create nimbus directory at {}",
                nimbus_dir.display()
            )
        })?;
    }

    Ok(nimbus_dir)
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }

    /// Weather API key with env override, matching the provider key rules.
    pub fn resolve_weather_api_key(&self) -> Result<String> {
        for var_name in ["WEATHER_API_KEY", "NIMBUS_WEATHER_API_KEY"] {
            if let Ok(key) = std::env::var(var_name)
                && !key.is_empty()
            {
                return Ok(key);
            }
        }
        if !self.weather_api_key.is_empty() {
            Ok(self.weather_api_key.clone())
        } else {
            anyhow::bail!("No weather API key found. Set WEATHER_API_KEY or run 'nimbus onboard'.")
        }
    }
}

pub fn load_config() -> Result<Config> {
    let config_path = get_config_path();

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found. Run 'nimbus onboard' to set up your configuration."
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    Ok(config)
}

pub fn save_config(config: &Config) -> Result<()> {
    ensure_nimbus_dir()?;

    let config_path = get_config_path();
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}
