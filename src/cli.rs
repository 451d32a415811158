use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Safe wallet CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(name = "safe_wallet", about = "Multi-owner safe wallet", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a wallet config and print the deployed owner set
    Deploy {
        /// Wallet config (TOML). Falls back to $SAFE_WALLET_CONFIG, then ./wallet.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Replay a JSON script of deposit/propose/confirm steps
    Simulate {
        #[arg(long)]
        config: Option<PathBuf>,
        /// JSON array of steps
        #[arg(long)]
        script: PathBuf,
    },
}

impl Commands {
    /// Config path from the flag, the environment, or the default.
    pub fn config_path(&self) -> PathBuf {
        let flag = match self {
            Commands::Deploy { config } | Commands::Simulate { config, .. } => config.clone(),
        };
        flag.or_else(|| std::env::var_os(crate::core::config::CONFIG_ENV_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("wallet.toml"))
    }
}
