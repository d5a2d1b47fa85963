pub mod cli;
pub mod config;
pub mod keys;
pub mod telemetry;

use anyhow::Result;
use cnft_client::{
    indexer::DasIndexer,
    rpc::{RpcConnectionConfig, SolanaRpcConnection, TreeAccountsExt},
    CompressionClient,
};
use cnft_mint_client::{MintOutcome, MintToCollection};
use cnft_sdk::{Creator, MetadataArgs};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use tracing::{info, warn};

use crate::{
    config::MintConfig,
    keys::{load_keypair_from_file, load_or_generate_keypair},
};

pub const ASSET_NAME: &str = "NFT Send Game";
pub const ASSET_SYMBOL: &str = "SSNC";
pub const ASSET_URI: &str = "https://backscattering.de/web-boardimage/board.svg?fen=rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR%20b%20-%20-%200%201&lastMove=g1h3&arrows=g1h3";
pub const ROYALTY_BASIS_POINTS: u16 = 100;

/// The minted record: 99% to the payer, 1% to the test wallet, neither
/// creator verified.
pub fn asset_metadata(payer: &Pubkey, test_wallet: &Pubkey) -> MetadataArgs {
    MetadataArgs {
        name: ASSET_NAME.to_string(),
        symbol: ASSET_SYMBOL.to_string(),
        uri: ASSET_URI.to_string(),
        seller_fee_basis_points: ROYALTY_BASIS_POINTS,
        creators: vec![Creator::new(*payer, 99), Creator::new(*test_wallet, 1)],
        ..Default::default()
    }
}

pub fn load_payer(config: &MintConfig) -> Result<Keypair> {
    match &config.payer_path {
        Some(path) => load_keypair_from_file(path),
        None => load_or_generate_keypair(&config.keys_dir, "payer"),
    }
}

pub async fn run(config: MintConfig) -> Result<MintOutcome> {
    let test_wallet = load_or_generate_keypair(&config.keys_dir, "testWallet")?;
    let payer = load_payer(&config)?;
    info!("Payer address: {}", payer.pubkey());
    info!("Test wallet address: {}", test_wallet.pubkey());
    info!("Tree address: {}", config.tree.merkle_tree);
    info!("Tree authority: {}", config.tree.tree_authority);
    info!("Collection mint: {}", config.collection.mint);
    info!("Collection metadata: {}", config.collection.metadata);
    info!("Collection master edition: {}", config.collection.master_edition);

    let client = CompressionClient::new(
        SolanaRpcConnection::new(RpcConnectionConfig::new(&config.rpc_url)),
        DasIndexer::new(config.indexer_url.clone(), config.indexer_api_key.clone()),
    );

    // Advisory only, the program enforces both.
    match client.get_tree_config(&config.tree.merkle_tree).await {
        Ok(tree_config) => {
            info!("Tree mint capacity left: {}", tree_config.remaining_capacity());
            if !tree_config.is_public && !tree_config.is_delegate(&payer.pubkey()) {
                warn!(
                    "Payer {} is neither creator nor delegate of tree {}",
                    payer.pubkey(),
                    config.tree.merkle_tree
                );
            }
        }
        Err(e) => warn!("Could not read tree config: {}", e),
    }
    match client.get_merkle_tree_state(&config.tree.merkle_tree).await {
        Ok(state) if state.is_full() => warn!("Tree {} is full", config.tree.merkle_tree),
        Ok(state) => info!(
            "Tree has {} of {} leaves in use",
            state.next_leaf_index,
            state.header.capacity()
        ),
        Err(e) => warn!("Could not read merkle tree: {}", e),
    }

    let leaf_owner = config.leaf_owner.unwrap_or_else(|| payer.pubkey());
    let mut action = MintToCollection::new(
        config.tree,
        config.collection,
        asset_metadata(&payer.pubkey(), &test_wallet.pubkey()),
        leaf_owner,
    );
    action.compute_unit_price = config.compute_unit_price;
    action.confirmation = config.confirmation;

    info!("Minting a single compressed NFT to {}...", leaf_owner);
    let outcome = action
        .execute_with_retry(&client, &payer, config.max_retries)
        .await?;
    info!("Mint signature: {}", outcome.signature);
    if let (Some(leaf_index), Some(asset_id)) = (outcome.leaf_index, outcome.asset_id) {
        info!("Asset id: {} (leaf {})", asset_id, leaf_index);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_metadata_is_mintable() {
        let payer = Pubkey::new_unique();
        let metadata = asset_metadata(&payer, &Pubkey::new_unique());
        metadata.validate(&[payer]).unwrap();
        assert_eq!(metadata.creators[0].share + metadata.creators[1].share, 100);
    }
}
