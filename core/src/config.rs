//! Configuration Management Module
//!
//! File-based configuration (TOML, JSON or YAML) for the server, the model
//! provider and logging, with environment variable overrides and validation.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::provider::anthropic::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Configuration file format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    Json,
    #[default]
    Toml,
    Yaml,
}

impl ConfigFormat {
    fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

impl std::str::FromStr for ConfigFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            _ => Err(anyhow!("Unsupported config format: {}", s)),
        }
    }
}

/// Which provider implementation to build
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Anthropic,
    Stub,
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "stub" => Ok(ProviderKind::Stub),
            _ => Err(anyhow!("Unknown provider: {}", s)),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub provider: ProviderConfig,
    pub logging: LoggingSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            allowed_origins: Vec::new(),
        }
    }
}

/// Model provider settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Output budget per reply
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Anthropic,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            timeout_seconds: 60,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    /// When set, logs also go to a daily-rolling file in this directory
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: None,
        }
    }
}

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
    config_format: ConfigFormat,
    config: AppConfig,
}

impl ConfigManager {
    /// Load from the default location, falling back to defaults
    ///
    /// Environment overrides are not applied; call
    /// [`ConfigManager::apply_env_overrides`] once logging is up so rejected
    /// values are reported.
    pub fn new() -> Result<Self> {
        let base_path = Self::default_base_path()?;
        let config_format = Self::detect_config_format(&base_path);
        Self::load_from(base_path.with_extension(config_format.extension()), config_format)
    }

    /// Default file location for a format
    pub fn default_config_path(format: ConfigFormat) -> Result<PathBuf> {
        Ok(Self::default_base_path()?.with_extension(format.extension()))
    }

    fn default_base_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("socratic").join("config"))
    }

    /// Load from an explicit file; the format follows the extension
    ///
    /// Like [`ConfigManager::new`], environment overrides are left to the
    /// caller.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::load_from(path.to_path_buf(), Self::format_of(path)?)
    }

    /// Defaults bound to `path`; the file is neither read nor required
    pub fn defaults_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            config_path: path.to_path_buf(),
            config_format: Self::format_of(path)?,
            config: AppConfig::default(),
        })
    }

    fn format_of(path: &Path) -> Result<ConfigFormat> {
        Ok(path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::parse::<ConfigFormat>)
            .transpose()?
            .unwrap_or_default())
    }

    /// Manager over defaults only; nothing is read from disk or environment
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            config_path: PathBuf::from("config.toml"),
            config_format: ConfigFormat::Toml,
            config,
        }
    }

    fn load_from(config_path: PathBuf, config_format: ConfigFormat) -> Result<Self> {
        let mut manager = Self {
            config_path,
            config_format,
            config: AppConfig::default(),
        };

        if manager.config_exists() {
            manager.load_config()?;
        }

        Ok(manager)
    }

    /// Get the configuration directory
    fn get_config_dir() -> Result<PathBuf> {
        dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))
    }

    /// Detect configuration format from whichever file exists
    fn detect_config_format(base_path: &Path) -> ConfigFormat {
        let candidates = [
            ("toml", ConfigFormat::Toml),
            ("json", ConfigFormat::Json),
            ("yaml", ConfigFormat::Yaml),
            ("yml", ConfigFormat::Yaml),
        ];

        candidates
            .iter()
            .find(|(ext, _)| base_path.with_extension(ext).exists())
            .map(|(_, format)| *format)
            .unwrap_or_default()
    }

    /// Check if configuration file exists
    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_config_format(&self) -> ConfigFormat {
        self.config_format
    }

    /// Load configuration from file
    pub fn load_config(&mut self) -> Result<()> {
        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            anyhow!(
                "Failed to read config file {:?}: {}",
                self.config_path,
                e
            )
        })?;

        self.config = Self::parse(&content, self.config_format)?;
        Ok(())
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<AppConfig> {
        Ok(match format {
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| anyhow!("Failed to parse TOML config: {}", e))?
            }
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| anyhow!("Failed to parse JSON config: {}", e))?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| anyhow!("Failed to parse YAML config: {}", e))?,
        })
    }

    /// Save configuration to file
    pub fn save_config(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    anyhow!("Failed to create config directory {:?}: {}", parent, e)
                })?;
            }
        }

        let content = match self.config_format {
            ConfigFormat::Toml => toml::to_string_pretty(&self.config)
                .map_err(|e| anyhow!("Failed to serialize TOML config: {}", e))?,
            ConfigFormat::Json => serde_json::to_string_pretty(&self.config)
                .map_err(|e| anyhow!("Failed to serialize JSON config: {}", e))?,
            ConfigFormat::Yaml => serde_yaml::to_string(&self.config)
                .map_err(|e| anyhow!("Failed to serialize YAML config: {}", e))?,
        };

        fs::write(&self.config_path, content).map_err(|e| {
            anyhow!(
                "Failed to write config file {:?}: {}",
                self.config_path,
                e
            )
        })?;

        info!("Saved configuration to {:?}", self.config_path);
        Ok(())
    }

    /// Apply environment variable overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply only the logging overrides, which never fail
    ///
    /// Needed before the subscriber exists; the full set is applied after.
    pub fn apply_logging_env_overrides(&mut self) {
        self.apply_logging_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_logging_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SOCRATIC_LOG_LEVEL") {
            self.config.logging.level = level;
            debug!("Applied env override for log level");
        }
    }

    /// Apply overrides from any variable source
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = &mut self.config.provider;

        if let Some(kind) = lookup("SOCRATIC_PROVIDER") {
            match kind.parse() {
                Ok(kind) => {
                    provider.kind = kind;
                    debug!("Applied env override for provider kind");
                }
                Err(e) => warn!("Ignoring SOCRATIC_PROVIDER: {}", e),
            }
        }

        // SOCRATIC_API_KEY wins over the provider's own variable
        if let Some(api_key) = lookup("SOCRATIC_API_KEY").or_else(|| lookup("ANTHROPIC_API_KEY")) {
            provider.api_key = Some(api_key);
            debug!("Applied env override for API key");
        }

        if let Some(base_url) = lookup("SOCRATIC_BASE_URL") {
            provider.base_url = base_url;
            debug!("Applied env override for base URL");
        }

        if let Some(model) = lookup("SOCRATIC_MODEL") {
            provider.model = model;
            debug!("Applied env override for model");
        }

        if let Some(value) = lookup("SOCRATIC_MAX_TOKENS") {
            match value.parse() {
                Ok(max_tokens) => provider.max_tokens = max_tokens,
                Err(_) => warn!("Ignoring SOCRATIC_MAX_TOKENS={:?}: not a number", value),
            }
        }

        if let Some(value) = lookup("SOCRATIC_TIMEOUT_SECONDS") {
            match value.parse() {
                Ok(timeout) => provider.timeout_seconds = timeout,
                Err(_) => warn!("Ignoring SOCRATIC_TIMEOUT_SECONDS={:?}: not a number", value),
            }
        }

        let server = &mut self.config.server;

        if let Some(host) = lookup("SOCRATIC_HOST") {
            server.host = host;
            debug!("Applied env override for host");
        }

        if let Some(value) = lookup("SOCRATIC_PORT") {
            match value.parse() {
                Ok(port) => server.port = port,
                Err(_) => warn!("Ignoring SOCRATIC_PORT={:?}: not a port number", value),
            }
        }

        self.apply_logging_overrides_from(&lookup);
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Get mutable configuration
    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Consume the manager, keeping the configuration
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Validate configuration
    pub fn validate_config(&self) -> Result<()> {
        self.config.validate()
    }
}

impl AppConfig {
    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        let provider = &self.provider;

        if provider.max_tokens == 0 {
            return Err(anyhow!("provider.max_tokens must be greater than zero"));
        }

        if provider.timeout_seconds == 0 {
            return Err(anyhow!("provider.timeout_seconds must be greater than zero"));
        }

        if provider.kind == ProviderKind::Anthropic {
            if provider.model.trim().is_empty() {
                return Err(anyhow!("provider.model must not be empty"));
            }
            let has_key = provider
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty());
            if !has_key {
                return Err(anyhow!(
                    "Anthropic provider requires an API key (set ANTHROPIC_API_KEY)"
                ));
            }
        }

        Ok(())
    }
}
