//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use shop_assistant::{AppData, AppState};
use shop_cache::Cache;

use crate::config::{CliConfig, StorageBackend, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory used by the file backend.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.data_dir)
    }

    /// Open the configured storage backend.
    pub fn open_cache(&self) -> Result<Cache> {
        tracing::debug!(backend = self.config.storage.backend.as_str(), "opening storage");
        match self.config.storage.backend {
            StorageBackend::Memory => Ok(Cache::open_memory()),
            StorageBackend::File => {
                let dir = self.data_dir();
                Cache::open_dir(&dir)
                    .with_context(|| format!("Failed to open data directory: {}", dir.display()))
            }
        }
    }

    /// Load the configured seed, or the bundled one.
    pub fn load_seed(&self) -> Result<AppData> {
        match &self.config.seed.path {
            Some(path) => AppData::from_path(self.resolve_path(path))
                .with_context(|| format!("Failed to load seed: {}", path)),
            None => AppData::bundled().context("Bundled seed data is invalid"),
        }
    }

    /// Build the application state.
    pub async fn start_state(&self) -> Result<AppState> {
        let cache = self.open_cache()?;
        let seed = self.load_seed()?;
        AppState::start(self.config.assistant.clone(), cache, seed)
            .context("Failed to load saved state (run `shop reset` to start over)")
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
