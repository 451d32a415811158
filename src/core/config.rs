//! Wallet deployment configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::domain::{Address, Amount};
use crate::core::errors::WalletError;
use crate::multisig::MultiSigConfig;

/// Environment variable naming the default config file for the binary.
pub const CONFIG_ENV_VAR: &str = "SAFE_WALLET_CONFIG";

/// Wallet deployment configuration, usually read from `wallet.toml`.
///
/// ```toml
/// owners = ["0x…01", "0x…02"]
/// required_confirmations = 2
/// payment_timeout_ms = 5000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletConfig {
    /// Authorized owners
    pub owners: Vec<Address>,

    /// Distinct owner confirmations needed before a transfer executes
    pub required_confirmations: usize,

    /// Upper bound on a single payment collaborator call (milliseconds)
    #[serde(default = "WalletConfig::default_payment_timeout_ms")]
    pub payment_timeout_ms: u64,

    /// Number of recent events kept by the event bus
    #[serde(default = "WalletConfig::default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// Funds credited to the wallet when the simulator ledger is created
    #[serde(default)]
    pub initial_balance: Amount,
}

impl WalletConfig {
    fn default_payment_timeout_ms() -> u64 { 5_000 }
    fn default_event_buffer_size() -> usize { 1_000 }

    pub fn new(owners: Vec<Address>, required_confirmations: usize) -> Self {
        Self {
            owners,
            required_confirmations,
            payment_timeout_ms: Self::default_payment_timeout_ms(),
            event_buffer_size: Self::default_event_buffer_size(),
            initial_balance: 0,
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| WalletError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    pub fn payment_timeout(&self) -> Duration {
        Duration::from_millis(self.payment_timeout_ms)
    }

    /// Check owner set and threshold, returning the validated multisig config.
    pub fn validate(&self) -> Result<MultiSigConfig, WalletError> {
        if self.payment_timeout_ms == 0 {
            return Err(WalletError::Config("payment_timeout_ms must be positive".to_string()));
        }
        MultiSigConfig::new(self.owners.clone(), self.required_confirmations)
    }
}
