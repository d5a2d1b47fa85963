use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::signature::{read_keypair_file, write_keypair_file, Keypair, Signer};
use tracing::info;

pub fn load_keypair_from_file(path: &Path) -> Result<Keypair> {
    read_keypair_file(path)
        .map_err(|e| anyhow!("Failed to read keypair {}: {}", path.display(), e))
}

/// Loads `<dir>/<name>.json`, generating and saving a new keypair on first use.
pub fn load_or_generate_keypair(dir: &Path, name: &str) -> Result<Keypair> {
    let path = dir.join(format!("{}.json", name));
    if path.exists() {
        return load_keypair_from_file(&path);
    }

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let keypair = Keypair::new();
    write_keypair_file(&keypair, &path)
        .map_err(|e| anyhow!("Failed to write keypair {}: {}", path.display(), e))?;
    info!("Generated keypair {} at {}", keypair.pubkey(), path.display());
    Ok(keypair)
}

/// Public keys saved by the tree and collection setup, all base58.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalKeys {
    pub tree_address: Option<String>,
    pub tree_authority: Option<String>,
    pub collection_mint: Option<String>,
    pub collection_metadata_account: Option<String>,
    pub collection_master_edition_account: Option<String>,
}

/// Reads the key file. A missing file is not an error.
pub fn load_local_keys(path: &Path) -> Result<Option<LocalKeys>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let keys = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid key file {}", path.display()))?;
    Ok(Some(keys))
}

/// Directory holding the key file and the local keypairs.
pub fn keys_dir(local_keys_path: &Path) -> PathBuf {
    match local_keys_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
