//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shop_assistant::AssistantConfig;

/// Log filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where state is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog and starting state.
    #[serde(default)]
    pub seed: SeedConfig,

    /// Assistant behavior.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// Storage backend kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per slot under `data_dir`.
    #[default]
    File,
    /// Nothing survives the process.
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::File => "file",
            StorageBackend::Memory => "memory",
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend, relative to the working directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    ".shop".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

/// Seed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Seed JSON file; the bundled seed is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Generate a default shop.toml config file.
pub fn generate_default_config() -> String {
    let assistant = AssistantConfig::default();
    format!(
        r#"# ShopSmart configuration

[storage]
backend = "file"        # or "memory"
data_dir = ".shop"

[seed]
# path = "seed.json"

[assistant]
response_delay_ms = {delay}
viewed_capacity = {viewed}
title_max_chars = {title}
page_size = {page}

[logging]
filter = "{filter}"
"#,
        delay = assistant.response_delay_ms,
        viewed = assistant.viewed_capacity,
        title = assistant.title_max_chars,
        page = assistant.page_size,
        filter = DEFAULT_LOG_FILTER,
    )
}
