use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kuvend_cache::{CleanupTrigger, KeyDeriver, DEFAULT_PROMPT_PREFIX_CHARS};
use kuvend_i18n::Language;

use crate::cli::args::Args;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct KuvendConfig {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub provider: ProviderConfig,
}

/// In-memory response cache
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Enable cache
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// TTL applied when a caller does not pass one, in milliseconds
    #[serde(default = "default_ttl_ms")]
    pub default_ttl_ms: u64,

    /// Number of prompt characters that participate in the cache key
    #[serde(default = "default_key_prefix_chars")]
    pub key_prefix_chars: usize,

    /// Cleanup configuration
    #[serde(default)]
    pub cleanup: CacheCleanupConfig,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_ttl_ms() -> u64 {
    300_000
}

fn default_key_prefix_chars() -> usize {
    DEFAULT_PROMPT_PREFIX_CHARS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            default_ttl_ms: default_ttl_ms(),
            key_prefix_chars: default_key_prefix_chars(),
            cleanup: CacheCleanupConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CacheCleanupConfig {
    /// Cleanup trigger type: "manual" or "periodic"
    #[serde(default = "default_cleanup_trigger")]
    pub trigger: String,

    /// Periodic sweep interval in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_cleanup_trigger() -> String {
    "manual".to_string()
}

fn default_interval_secs() -> u64 {
    60
}

impl Default for CacheCleanupConfig {
    fn default() -> Self {
        Self {
            trigger: default_cleanup_trigger(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn to_key_deriver(&self) -> KeyDeriver {
        KeyDeriver::new(self.key_prefix_chars)
    }

    pub fn to_cleanup_trigger(&self) -> CleanupTrigger {
        match self.cleanup.trigger.as_str() {
            "periodic" => CleanupTrigger::Periodic {
                interval_secs: self.cleanup.interval_secs,
            },
            _ => CleanupTrigger::Manual,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Locale of the reasoning cycle and persona templates: "sq" or "en"
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "sq".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

impl PipelineConfig {
    pub fn language(&self) -> Language {
        Language::from_string(&self.language)
    }
}

/// External generation provider
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Chat-completions endpoint. Generation is unavailable when unset.
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_provider_timeout() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KuvendConfig {
    /// Merge another config into this one (other takes precedence for set values)
    pub fn merge(&mut self, other: &KuvendConfig) {
        if other.cache.enabled != default_cache_enabled() {
            self.cache.enabled = other.cache.enabled;
        }
        if other.cache.default_ttl_ms != default_ttl_ms() {
            self.cache.default_ttl_ms = other.cache.default_ttl_ms;
        }
        if other.cache.key_prefix_chars != default_key_prefix_chars() {
            self.cache.key_prefix_chars = other.cache.key_prefix_chars;
        }
        if other.cache.cleanup.trigger != default_cleanup_trigger() {
            self.cache.cleanup.trigger = other.cache.cleanup.trigger.clone();
        }
        if other.cache.cleanup.interval_secs != default_interval_secs() {
            self.cache.cleanup.interval_secs = other.cache.cleanup.interval_secs;
        }

        if other.pipeline.language != default_language() {
            self.pipeline.language = other.pipeline.language.clone();
        }

        if other.provider.base_url.is_some() {
            self.provider.base_url = other.provider.base_url.clone();
        }
        if other.provider.model != default_model() {
            self.provider.model = other.provider.model.clone();
        }
        if other.provider.api_key_env != default_api_key_env() {
            self.provider.api_key_env = other.provider.api_key_env.clone();
        }
        if other.provider.timeout_secs != default_provider_timeout() {
            self.provider.timeout_secs = other.provider.timeout_secs;
        }
    }

    pub fn generate_default_config() -> String {
        let default_config = Self::default();
        toml::to_string_pretty(&default_config).unwrap_or_else(|_| {
            r#"# Kuvend Configuration File

[cache]
enabled = true
default_ttl_ms = 300000
key_prefix_chars = 50

[cache.cleanup]
# "manual" or "periodic"
trigger = "manual"
interval_secs = 60

[pipeline]
# "sq" or "en"
language = "sq"

[provider]
# base_url = "https://api.openai.com/v1/chat/completions"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
timeout_secs = 60
"#
            .to_string()
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: KuvendConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the user config file path (~/.config/kuvend/config.toml)
    pub fn get_user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/kuvend/config.toml"))
    }

    /// Get the system config file path (/etc/kuvend/config.toml)
    pub fn get_system_config_path() -> PathBuf {
        PathBuf::from("/etc/kuvend/config.toml")
    }

    /// Get the current directory config file path (./kuvend.toml)
    pub fn get_current_config_path() -> PathBuf {
        PathBuf::from("./kuvend.toml")
    }

    /// Load and merge configs from all sources with priority:
    /// 1. User config (~/.config/kuvend/config.toml) - lowest priority (base)
    /// 2. Current directory (./kuvend.toml)
    /// 3. System config (/etc/kuvend/config.toml) - highest priority
    pub fn load_with_merged_configs() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let candidates = Self::get_user_config_path()
            .into_iter()
            .chain([Self::get_current_config_path(), Self::get_system_config_path()]);

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(file_config) => {
                    config.merge(&file_config);
                    tracing::debug!("Loaded config from: {}", path.display());
                }
                Err(e) => tracing::warn!("Skipping config {}: {}", path.display(), e),
            }
        }

        Ok(config)
    }

    pub fn apply_env_vars(&mut self, env_vars: &HashMap<String, String>) -> Result<()> {
        for (key, value) in env_vars {
            if let Some(config_key) = key.strip_prefix("KUVEND_") {
                match config_key {
                    "CACHE_ENABLED" => {
                        self.cache.enabled = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid cache enabled value: {}", value))?;
                    }
                    "CACHE_DEFAULT_TTL_MS" => {
                        self.cache.default_ttl_ms = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid default_ttl_ms value: {}", value))?;
                    }
                    "CACHE_KEY_PREFIX_CHARS" => {
                        self.cache.key_prefix_chars = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid key_prefix_chars value: {}", value))?;
                    }
                    "CACHE_CLEANUP_TRIGGER" => self.cache.cleanup.trigger = value.clone(),
                    "CACHE_CLEANUP_INTERVAL_SECS" => {
                        self.cache.cleanup.interval_secs = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid interval_secs value: {}", value))?;
                    }
                    "PIPELINE_LANGUAGE" => self.pipeline.language = value.clone(),
                    "PROVIDER_BASE_URL" => self.provider.base_url = Some(value.clone()),
                    "PROVIDER_MODEL" => self.provider.model = value.clone(),
                    "PROVIDER_API_KEY_ENV" => self.provider.api_key_env = value.clone(),
                    "PROVIDER_TIMEOUT_SECS" => {
                        self.provider.timeout_secs = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid timeout_secs value: {}", value))?;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    pub fn apply_cli_args(&mut self, args: &Args) {
        if let Some(language) = &args.language {
            self.pipeline.language = language.clone();
        }
        if let Some(ttl_ms) = args.ttl_ms {
            self.cache.default_ttl_ms = ttl_ms;
        }
        if args.no_cache {
            self.cache.enabled = false;
        }
    }

    /// Load configuration with precedence:
    /// 1. Defaults
    /// 2. User, current directory and system files (see `load_with_merged_configs`)
    /// 3. Explicit `--config` file
    /// 4. Environment variables (KUVEND_*)
    /// 5. CLI arguments (highest)
    pub fn load_with_precedence(
        config_path: Option<PathBuf>,
        cli_args: &Args,
        env_vars: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut config = Self::load_with_merged_configs().unwrap_or_else(|_| Self::default());

        if let Some(path) = config_path {
            let explicit_config = Self::load_from_file(&path)
                .map_err(|e| anyhow!("Failed to load config file {}: {}", path.display(), e))?;
            config.merge(&explicit_config);
        }

        config.apply_env_vars(env_vars)?;
        config.apply_cli_args(cli_args);
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.default_ttl_ms == 0 {
            return Err(invalid("cache.default_ttl_ms", "0", "must be positive"));
        }

        if self.cache.key_prefix_chars == 0 {
            return Err(invalid("cache.key_prefix_chars", "0", "must be positive"));
        }

        match self.cache.cleanup.trigger.as_str() {
            "manual" => {}
            "periodic" if self.cache.cleanup.interval_secs == 0 => {
                return Err(invalid(
                    "cache.cleanup.interval_secs",
                    "0",
                    "periodic cleanup needs a positive interval",
                ));
            }
            "periodic" => {}
            other => {
                return Err(invalid(
                    "cache.cleanup.trigger",
                    other,
                    "expected \"manual\" or \"periodic\"",
                ));
            }
        }

        if Language::parse(&self.pipeline.language).is_none() {
            return Err(invalid(
                "pipeline.language",
                &self.pipeline.language,
                "expected \"sq\" or \"en\"",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
