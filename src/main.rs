// src/main.rs
//! Safe wallet entry point: deploys a wallet from config or replays a script.
use anyhow::{Context, Result};
use clap::Parser;
use safe_wallet::cli::{Cli, Commands};
use safe_wallet::core::config::WalletConfig;
use safe_wallet::simulation::{load_script, Simulator};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    let config_path = cli.command.config_path();
    let config = WalletConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    match cli.command {
        Commands::Deploy { .. } => {
            let sim = Simulator::new(&config)?;
            let engine = sim.engine();
            info!("Safe wallet deployed from {}", config_path.display());
            let summary = serde_json::json!({
                "owners": engine.owners(),
                "required_confirmations": engine.required_confirmations(),
                "payment_timeout_ms": engine.payment_timeout().as_millis() as u64,
                "balance": sim.ledger().balance().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Simulate { script, .. } => {
            let steps = load_script(&script)?;
            let sim = Simulator::new(&config)?;
            info!("Replaying {} steps from {}", steps.len(), script.display());
            for report in sim.run(steps).await {
                println!("{}", serde_json::to_string(&report)?);
            }
            info!("Final wallet balance: {}", sim.ledger().balance());
        }
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
