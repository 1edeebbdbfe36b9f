//! Application configuration
//!
//! Layered: CLI flags (with env fallbacks) override the JSON config file,
//! which overrides built-in defaults. The config file is optional; the
//! default location is `<data dir>/stockroom.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::cli::CliConfig;
use super::constants::{CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT};
use super::storage::AppStorage;

/// True when the host binds every interface
pub fn is_all_interfaces(host: &str) -> bool {
    host == "0.0.0.0" || host == "::"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub debug: bool,
}

/// Partial shape of the on-disk config file; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<FileServerConfig>,
    debug: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct FileServerConfig {
    host: Option<String>,
    port: Option<u16>,
}

impl AppConfig {
    /// Load configuration, merging CLI > config file > defaults.
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let file = Self::load_file(cli.config.as_deref())?;

        let mut config = AppConfig::default();

        if let Some(server) = file.server {
            if let Some(host) = server.host {
                config.server.host = host;
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
        }
        if let Some(debug) = file.debug {
            config.debug = debug;
        }

        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if cli.debug {
            config.debug = true;
        }

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            debug = config.debug,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Read the config file if it exists. An explicit `--config` path that
    /// does not exist is an error; the default location is optional.
    fn load_file(explicit: Option<&Path>) -> Result<FileConfig> {
        let (path, required): (PathBuf, bool) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => (AppStorage::resolve_data_dir().join(CONFIG_FILE_NAME), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Ok(FileConfig::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}
