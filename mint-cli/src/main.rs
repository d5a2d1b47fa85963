use anyhow::Result;
use clap::Parser;
use cnft_mint_cli::{
    cli::{load_dotenv, Cli},
    config::MintConfig,
    keys::load_local_keys,
    run,
    telemetry::setup_telemetry,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = load_dotenv();
    setup_telemetry();
    if let Some(path) = env_file {
        info!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    let keys = load_local_keys(&cli.local_keys_path)?;
    if keys.is_none() {
        warn!(
            "No local keys found at {}, using the environment only",
            cli.local_keys_path.display()
        );
    }
    let config = MintConfig::new(&cli, keys.as_ref())?;

    if let Err(e) = run(config).await {
        error!("Mint failed: {:?}", e);
        return Err(e);
    }
    Ok(())
}
