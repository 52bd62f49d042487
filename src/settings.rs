use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("couldn't parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no config directory available on this system")]
    NoConfigDir,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct ChimeConfig {
    pub toasts: ToastConfig,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Maximum number of toasts held at once; publishing past the cap
    /// silently evicts the oldest
    pub max_toasts: usize,
    /// Auto-dismiss timeout in milliseconds (0 = no auto-dismiss)
    pub timeout_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            max_toasts: 5,
            timeout_ms: 5000,
        }
    }
}

#[derive(Debug)]
pub struct ConfigManager {
    config: ChimeConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager instance
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        let config = Self::load_config(&config_path)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// load configuration from file, create default if doesn't exist
    pub fn load_config(path: &PathBuf) -> Result<ChimeConfig, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: ChimeConfig = serde_json::from_str(&content)?;
            log::info!("loaded configuration from: {}", path.display());
            Ok(config)
        } else {
            let default_config = ChimeConfig::default();

            // create config directory if it doesn't exist
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            // write default config
            let content = serde_json::to_string_pretty(&default_config)?;
            fs::write(path, content)?;
            log::info!("created default configuration at: {}", path.display());

            Ok(default_config)
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("chime").join("config.json"))
    }

    /// Get the current configuration
    pub fn config(&self) -> &ChimeConfig {
        &self.config
    }

    /// Update configuration and save to file
    pub fn update_config(&mut self, config: ChimeConfig) -> Result<(), ConfigError> {
        self.config = config;
        self.save()?;
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, content)?;
        log::info!("saved configuration to: {}", self.config_path.display());
        Ok(())
    }

    /// Reload configuration from file
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.config = Self::load_config(&self.config_path)?;
        log::info!("reloaded configuration from file");
        Ok(())
    }
}

use std::sync::{Mutex, OnceLock};

/// Global configuration instance
static CONFIG: OnceLock<Mutex<ChimeConfig>> = OnceLock::new();

/// Initialize the global configuration manager
pub fn init() -> Result<()> {
    let config = match ConfigManager::new() {
        Ok(manager) => manager.config,
        Err(e) => {
            log::error!("failed to load configuration: {}", e);
            log::info!("using default configuration");
            ChimeConfig::default()
        }
    };

    CONFIG
        .set(Mutex::new(config))
        .map_err(|_| anyhow::anyhow!("configuration already initialized"))?;

    Ok(())
}

/// Get a copy of the current configuration
pub fn get_config() -> ChimeConfig {
    CONFIG
        .get()
        .and_then(|config| config.lock().ok())
        .map(|config| config.clone())
        .unwrap_or_default()
}

/// Update the global configuration
pub fn update_config(new_config: ChimeConfig) -> Result<()> {
    if let Some(config_mutex) = CONFIG.get() {
        if let Ok(mut config) = config_mutex.lock() {
            *config = new_config.clone();

            // also save to file
            let config_path = ConfigManager::config_path()?;
            let content = serde_json::to_string_pretty(&new_config)?;
            fs::write(&config_path, content)?;
            log::info!("updated and saved configuration");
        }
    }
    Ok(())
}
