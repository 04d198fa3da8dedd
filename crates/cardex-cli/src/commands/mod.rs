//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod level;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use cardex_core::ClientConfig;

/// Client settings that may override the config file.
#[derive(Args, Debug, Default)]
pub struct ClientArgs {
    /// Provider API key
    #[arg(long, env = "CARDEX_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Provider product base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Maximum job status queries in async mode
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Milliseconds between job status queries
    #[arg(long)]
    poll_delay_ms: Option<u64>,
}

impl ClientArgs {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.poll.max_attempts = max_attempts;
        }
        if let Some(delay_ms) = self.poll_delay_ms {
            config.poll.delay_ms = delay_ms;
        }
        config
    }
}

/// Location of the user-level configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardex")
        .join("config.json")
}

/// Config file to use: the explicit one, or the user-level default.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the explicit config file, or the default one when it exists.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<ClientConfig> {
    if let Some(path) = explicit {
        debug!("Loading config from {}", path);
        return Ok(ClientConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(ClientConfig::from_file(&path)?)
    } else {
        Ok(ClientConfig::default())
    }
}
