use std::path::PathBuf;

use anyhow::{anyhow, Result};
use cnft_mint_client::{parse_pubkey, CollectionRef, ConfirmationConfig, TreeRef};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::{
    cli::Cli,
    keys::{keys_dir, LocalKeys},
};

/// Everything a mint run needs, resolved from the command line, the
/// environment and the persisted key file.
#[derive(Debug, Clone)]
pub struct MintConfig {
    pub rpc_url: String,
    pub indexer_url: String,
    pub indexer_api_key: Option<String>,
    pub payer_path: Option<PathBuf>,
    pub keys_dir: PathBuf,
    pub tree: TreeRef,
    pub collection: CollectionRef,
    pub leaf_owner: Option<Pubkey>,
    pub compute_unit_price: Option<u64>,
    pub confirmation: ConfirmationConfig,
    pub max_retries: u32,
}

/// An explicit value wins over the key file.
fn pick<'a>(
    field: &str,
    explicit: &'a Option<String>,
    persisted: Option<&'a Option<String>>,
) -> Option<&'a str> {
    if let Some(value) = explicit.as_deref() {
        debug!("Using {} from the environment", field);
        return Some(value);
    }
    let value = persisted.and_then(|value| value.as_deref());
    if value.is_some() {
        debug!("Using {} from the key file", field);
    }
    value
}

impl MintConfig {
    pub fn new(cli: &Cli, keys: Option<&LocalKeys>) -> Result<Self> {
        let tree_address = pick(
            "TREE_ADDRESS",
            &cli.tree_address,
            keys.map(|k| &k.tree_address),
        )
        .ok_or_else(|| anyhow!("TREE_ADDRESS is not set and not in the key file"))?;
        let merkle_tree = parse_pubkey("TREE_ADDRESS", tree_address)?;

        let tree = match pick(
            "TREE_AUTHORITY",
            &cli.tree_authority,
            keys.map(|k| &k.tree_authority),
        ) {
            Some(authority) => TreeRef::with_authority(
                merkle_tree,
                parse_pubkey("TREE_AUTHORITY", authority)?,
            )?,
            None => TreeRef::new(merkle_tree),
        };

        let collection_mint = pick(
            "COLLECTION_MINT",
            &cli.collection_mint,
            keys.map(|k| &k.collection_mint),
        )
        .ok_or_else(|| anyhow!("COLLECTION_MINT is not set and not in the key file"))?;
        let derived = CollectionRef::new(parse_pubkey("COLLECTION_MINT", collection_mint)?);

        let metadata = match pick(
            "COLLECTION_METADATA",
            &cli.collection_metadata,
            keys.map(|k| &k.collection_metadata_account),
        ) {
            Some(value) => parse_pubkey("COLLECTION_METADATA", value)?,
            None => derived.metadata,
        };
        let master_edition = match pick(
            "COLLECTION_MASTER_EDITION",
            &cli.collection_master_edition,
            keys.map(|k| &k.collection_master_edition_account),
        ) {
            Some(value) => parse_pubkey("COLLECTION_MASTER_EDITION", value)?,
            None => derived.master_edition,
        };
        let collection = CollectionRef::with_accounts(derived.mint, metadata, master_edition)?;

        let leaf_owner = cli
            .leaf_owner
            .as_deref()
            .map(|owner| parse_pubkey("LEAF_OWNER", owner))
            .transpose()?;

        Ok(Self {
            rpc_url: cli.rpc_url.clone(),
            indexer_url: cli
                .indexer_url
                .clone()
                .unwrap_or_else(|| cli.rpc_url.clone()),
            indexer_api_key: cli.indexer_api_key.clone(),
            payer_path: cli.payer.clone(),
            keys_dir: keys_dir(&cli.local_keys_path),
            tree,
            collection,
            leaf_owner,
            compute_unit_price: cli.compute_unit_price,
            confirmation: ConfirmationConfig {
                max_attempts: cli.max_confirmation_attempts,
                ..Default::default()
            },
            max_retries: cli.max_retries,
        })
    }
}
