//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/hlscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/hlscope/` (~/.config/hlscope/)
//! - Data: `$XDG_DATA_HOME/hlscope/` (~/.local/share/hlscope/)
//! - State/Logs: `$XDG_STATE_HOME/hlscope/` (~/.local/state/hlscope/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Info endpoint base for mainnet
pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";

/// Info endpoint base for testnet
pub const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";

/// Environment variable that selects mainnet when set to `TRUE`
pub const MAINNET_ENV_VAR: &str = "ISMAINNET";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Info endpoint selection and timeouts
    #[serde(default)]
    pub network: NetworkConfig,

    /// Where per-agent data directories live
    #[serde(default)]
    pub data: DataConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-agent settings keyed by agent id
    #[serde(default)]
    pub agents: HashMap<String, AgentConfig>,
}

/// Info endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    /// Use mainnet instead of testnet
    #[serde(default)]
    pub mainnet: bool,

    /// Explicit API base URL, overrides the mainnet/testnet choice
    pub api_url: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mainnet: false,
            api_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

impl NetworkConfig {
    /// Apply the `ISMAINNET` environment override, if set.
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(MAINNET_ENV_VAR) {
            self.mainnet = value == "TRUE";
        }
    }

    /// Full URL of the info endpoint
    pub fn info_url(&self) -> String {
        let base = match &self.api_url {
            Some(url) => url.trim_end_matches('/'),
            None if self.mainnet => MAINNET_API_URL,
            None => TESTNET_API_URL,
        };
        format!("{}/info", base)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "network.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if let Some(url) = &self.api_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "network.api_url must be an http(s) URL, got {:?}",
                    url
                )));
            }
        }
        Ok(())
    }
}

/// Agent data location
#[derive(Debug, Deserialize, Default)]
pub struct DataConfig {
    /// Root holding `<agent_id>/config.json` and `<agent_id>/logs/`
    pub root: Option<PathBuf>,

    /// Directory with the shared prompt documents (default: `prompt` next to the root)
    pub prompt_dir: Option<PathBuf>,
}

/// Settings for one agent
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// Wallet address queried on the info endpoint
    pub account_address: String,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            let mut config = Config::default();
            config.network.apply_env();
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let mut config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.network.apply_env();
        config.network.validate()?;

        Ok(config)
    }

    /// Root directory for agent data, configured or XDG default
    pub fn data_root(&self) -> PathBuf {
        self.data
            .root
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("agents"))
    }

    /// Logs directory for one agent: `<data_root>/<agent_id>/logs`
    pub fn agent_logs_dir(&self, agent_id: &str) -> PathBuf {
        self.data_root().join(agent_id).join("logs")
    }

    /// Agent config document: `<data_root>/<agent_id>/config.json`
    pub fn agent_config_path(&self, agent_id: &str) -> PathBuf {
        self.data_root().join(agent_id).join("config.json")
    }

    /// Prompt documents shared by all agents
    pub fn prompt_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data.prompt_dir {
            return dir.clone();
        }
        let root = self.data_root();
        root.parent().unwrap_or(root.as_path()).join("prompt")
    }

    /// Account address configured for an agent
    pub fn account_address(&self, agent_id: &str) -> Result<&str> {
        self.agents
            .get(agent_id)
            .map(|a| a.account_address.as_str())
            .ok_or_else(|| Error::AgentNotFound(agent_id.to_string()))
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/hlscope/config.toml` (~/.config/hlscope/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("hlscope").join("config.toml")
    }

    /// Returns the data directory path
    ///
    /// `$XDG_DATA_HOME/hlscope/` (~/.local/share/hlscope/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("hlscope")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/hlscope/` (~/.local/state/hlscope/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("hlscope")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("hlscope.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.network.mainnet);
        assert_eq!(config.network.timeout_secs, 10);
        assert!(config.agents.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[network]
mainnet = true
timeout_secs = 3

[data]
root = "/srv/agents"

[logging]
level = "debug"

[agents.alpha]
account_address = "0xabc"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.network.mainnet);
        assert_eq!(config.network.timeout_secs, 3);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.account_address("alpha").unwrap(), "0xabc");
        assert_eq!(
            config.agent_logs_dir("alpha"),
            PathBuf::from("/srv/agents/alpha/logs")
        );
        assert_eq!(
            config.agent_config_path("alpha"),
            PathBuf::from("/srv/agents/alpha/config.json")
        );
        assert_eq!(config.prompt_dir(), PathBuf::from("/srv/prompt"));
    }

    #[test]
    fn test_explicit_prompt_dir() {
        let toml = r#"
[data]
root = "/srv/agents"
prompt_dir = "/etc/hlscope/prompts"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.prompt_dir(), PathBuf::from("/etc/hlscope/prompts"));
    }

    #[test]
    fn test_unknown_agent() {
        let config = Config::default();
        assert!(matches!(
            config.account_address("ghost"),
            Err(Error::AgentNotFound(id)) if id == "ghost"
        ));
    }

    #[test]
    fn test_info_url() {
        let mut network = NetworkConfig::default();
        assert_eq!(
            network.info_url(),
            "https://api.hyperliquid-testnet.xyz/info"
        );

        network.mainnet = true;
        assert_eq!(network.info_url(), "https://api.hyperliquid.xyz/info");

        network.api_url = Some("http://127.0.0.1:9000/".to_string());
        assert_eq!(network.info_url(), "http://127.0.0.1:9000/info");
    }

    #[test]
    fn test_network_validation() {
        assert!(NetworkConfig::default().validate().is_ok());

        let network = NetworkConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(network.validate().is_err());

        let network = NetworkConfig {
            api_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(network.validate().is_err());
    }
}
