use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ssh_service::{validate_host_alias, SshRunner};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SshSettings {
    /// Local ssh client to run.
    pub program: String,
    /// Extra options placed before the host alias, e.g. `-o BatchMode=yes`.
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub default_host: String,
    /// The only aliases `--hostname` accepts.
    pub hosts: Vec<String>,
    #[serde(default)]
    pub ssh: SshSettings,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            options: Vec::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_host: "foice".to_string(),
            hosts: vec!["foice".to_string()],
            ssh: SshSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn ssh_runner(&self) -> SshRunner {
        SshRunner::new(self.ssh.program.clone(), self.ssh.options.clone())
    }
}

#[derive(Debug)]
pub struct ConfigManager {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("vtui");
        Self::with_dir(config_dir)
    }

    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        let config_file = config_dir.join("vtui.toml");

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        // If config file doesn't exist, create it with default values
        if !self.config_file.exists() {
            let default_config = AppConfig::default();
            self.save_config(&default_config)?;
        }

        let content = fs::read_to_string(&self.config_file).context("Failed to read config file")?;

        let mut config: AppConfig =
            toml::from_str(&content).context("Failed to parse config file")?;

        config.hosts.retain(|host| match validate_host_alias(host) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Ignoring host from config: {}", e);
                false
            }
        });

        // Ensure there's always at least the default host
        if config.hosts.is_empty() {
            config.hosts = AppConfig::default().hosts;
        }

        // Ensure the default host is one of the known hosts
        if !config.hosts.contains(&config.default_host) {
            config.default_host = config.hosts[0].clone();
        }

        tracing::info!(
            "Loaded config from {:?}: {} hosts, default {}",
            self.config_file,
            config.hosts.len(),
            config.default_host
        );

        Ok(config)
    }

    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&self.config_file, toml).context("Failed to write config file")?;
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_file
    }
}
