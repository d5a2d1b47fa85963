use std::path::PathBuf;

use clap::Parser;

pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

/// Loads `.env` from the working directory or a parent. Variables already
/// set in the environment are kept.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "RPC_URL", default_value = DEVNET_RPC_URL)]
    pub rpc_url: String,

    /// DAS endpoint. Defaults to the RPC url.
    #[arg(long, env = "INDEXER_URL")]
    pub indexer_url: Option<String>,

    #[arg(long, env = "INDEXER_API_KEY")]
    pub indexer_api_key: Option<String>,

    /// Payer keypair file. Without it a `payer` keypair is loaded from, or
    /// generated into, the local keys directory.
    #[arg(long, env = "LOCAL_PAYER_JSON_ABSPATH")]
    pub payer: Option<PathBuf>,

    #[arg(long, env = "TREE_ADDRESS")]
    pub tree_address: Option<String>,

    #[arg(long, env = "TREE_AUTHORITY")]
    pub tree_authority: Option<String>,

    #[arg(long, env = "COLLECTION_MINT")]
    pub collection_mint: Option<String>,

    #[arg(long, env = "COLLECTION_METADATA")]
    pub collection_metadata: Option<String>,

    #[arg(long, env = "COLLECTION_MASTER_EDITION")]
    pub collection_master_edition: Option<String>,

    /// Persisted public keys of the tree and collection. Keypairs are kept
    /// next to it.
    #[arg(long, env = "LOCAL_KEYS_PATH", default_value = ".local_keys/keys.json")]
    pub local_keys_path: PathBuf,

    /// Recipient of the asset. Defaults to the payer.
    #[arg(long, env = "LEAF_OWNER")]
    pub leaf_owner: Option<String>,

    #[arg(long, env = "COMPUTE_UNIT_PRICE")]
    pub compute_unit_price: Option<u64>,

    #[arg(long, env = "MAX_CONFIRMATION_ATTEMPTS", default_value = "30")]
    pub max_confirmation_attempts: u32,

    /// Rebuild and resubmit on tree sequence conflicts up to this many times.
    #[arg(long, env = "MAX_RETRIES", default_value = "3")]
    pub max_retries: u32,
}
