//! Deployer configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DeployError;

/// Target network of a deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    /// In-process development chain.
    Development,
    /// Local ganache-style chain with pre-funded accounts.
    Ganache,
    /// Public test network reached through a hosted node.
    RinkebyAlchemy,
}

impl Network {
    /// Production networks sign with the operator-configured key; all
    /// others use the first pre-funded account.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::RinkebyAlchemy)
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Ganache => "ganache",
            Self::RinkebyAlchemy => "rinkeby-alchemy",
        }
    }
}

/// Configuration for a deployment run.
///
/// Can be loaded from a TOML file via [`DeployConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Which network to publish on.
    #[serde(default = "default_network")]
    pub network: Network,

    /// Hex-encoded operator key, required on production networks.
    #[serde(default)]
    pub from_key: Option<String>,

    /// Number of pre-funded accounts on development networks.
    #[serde(default = "default_dev_accounts")]
    pub dev_accounts: usize,

    /// Base-asset balance of each pre-funded account, in whole units.
    #[serde(default = "default_dev_account_balance")]
    pub dev_account_balance: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> Network {
    Network::Development
}

fn default_dev_accounts() -> usize {
    10
}

fn default_dev_account_balance() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DeployConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, DeployError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DeployError> {
        toml::from_str(s).map_err(|e| DeployError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DeployError> {
        toml::to_string_pretty(self).map_err(|e| DeployError::Config(e.to_string()))
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            from_key: None,
            dev_accounts: default_dev_accounts(),
            dev_account_balance: default_dev_account_balance(),
            log_level: default_log_level(),
        }
    }
}
