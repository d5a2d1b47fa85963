//! Mint a compressed NFT into a verified collection.

use cnft_client::{
    indexer::{AssetProof, Indexer, RetryConfig},
    rpc::RpcConnection,
    wait_for_asset_proof,
};
use cnft_sdk::{
    event::find_leaf_index, pda::get_asset_id, Collection, LeafSchema, MetadataArgs,
    MintToCollectionV1Accounts,
};
use solana_sdk::{
    clock::Slot,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

use crate::{
    addresses::{CollectionRef, TreeRef},
    attempt::MintAttempt,
    confirmation::ConfirmationConfig,
    error::MintError,
    send_transaction::{
        build_signed_transaction, record_signature, send_and_confirm, with_compute_budget,
    },
};

/// Result of a confirmed mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub signature: Signature,
    pub slot: Slot,
    /// `None` when the change-log event could not be read back.
    pub leaf_index: Option<u32>,
    pub asset_id: Option<Pubkey>,
}

/// Parameters for minting one asset with `mint_to_collection_v1`.
///
/// The payer signs, pays, and acts as tree delegate and collection
/// authority. The leaf delegate is the leaf owner.
///
/// # Example
/// ```ignore
/// let outcome = MintToCollection::new(
///     TreeRef::new(tree),
///     CollectionRef::new(collection_mint),
///     metadata,
///     payer.pubkey(),
/// )
/// .execute(&client, &payer)
/// .await?;
/// ```
#[derive(Debug, Clone)]
pub struct MintToCollection {
    pub tree: TreeRef,
    pub collection: CollectionRef,
    pub metadata: MetadataArgs,
    pub leaf_owner: Pubkey,
    pub compute_unit_price: Option<u64>,
    pub compute_unit_limit: Option<u32>,
    pub confirmation: ConfirmationConfig,
}

impl MintToCollection {
    pub fn new(
        tree: TreeRef,
        collection: CollectionRef,
        metadata: MetadataArgs,
        leaf_owner: Pubkey,
    ) -> Self {
        Self {
            tree,
            collection,
            metadata,
            leaf_owner,
            compute_unit_price: None,
            compute_unit_limit: None,
            confirmation: ConfirmationConfig::default(),
        }
    }

    /// Metadata as it is sent, with the collection field filled in.
    pub fn prepared_metadata(&self, payer: &Pubkey) -> Result<MetadataArgs, MintError> {
        self.metadata
            .validate(&[*payer])
            .map_err(MintError::InvalidMetadata)?;
        self.metadata
            .clone()
            .with_collection(&self.collection.mint)
            .map_err(MintError::InvalidMetadata)
    }

    /// Validates everything locally and builds the instructions to sign.
    pub fn instructions(&self, payer: &Pubkey) -> Result<Vec<Instruction>, MintError> {
        let metadata = self.prepared_metadata(payer)?;
        self.tree.validate()?;
        self.collection.validate()?;

        let accounts = MintToCollectionV1Accounts {
            tree_authority: self.tree.tree_authority,
            collection_metadata: self.collection.metadata,
            edition_account: self.collection.master_edition,
            ..MintToCollectionV1Accounts::new(
                self.tree.merkle_tree,
                self.collection.mint,
                *payer,
                self.leaf_owner,
            )
        };
        let instruction = cnft_sdk::create_mint_to_collection_v1_instruction(&accounts, &metadata)
            .map_err(MintError::InvalidMetadata)?;
        debug!(
            "Built mint_to_collection_v1 for tree {} and collection {}",
            self.tree.merkle_tree, self.collection.mint
        );

        Ok(with_compute_budget(
            instruction,
            self.compute_unit_price,
            self.compute_unit_limit,
        ))
    }

    pub async fn execute<C: RpcConnection + Indexer>(
        &self,
        client: &C,
        payer: &Keypair,
    ) -> Result<MintOutcome, MintError> {
        self.execute_inner(client, payer, None).await
    }

    /// Like [`Self::execute`], bounded by `deadline`. Fetching the blockhash
    /// past the deadline fails before anything is sent. Once sent, the
    /// transaction may still land after a timeout.
    pub async fn execute_with_deadline<C: RpcConnection + Indexer>(
        &self,
        client: &C,
        payer: &Keypair,
        deadline: Instant,
    ) -> Result<MintOutcome, MintError> {
        self.execute_inner(client, payer, Some(deadline)).await
    }

    /// Rebuilds and resubmits with a fresh blockhash on sequence conflicts,
    /// at most `max_retries` times. Other errors are returned as they are.
    pub async fn execute_with_retry<C: RpcConnection + Indexer>(
        &self,
        client: &C,
        payer: &Keypair,
        max_retries: u32,
    ) -> Result<MintOutcome, MintError> {
        let mut retries = 0;
        loop {
            match self.execute_inner(client, payer, None).await {
                Err(e @ MintError::SequenceConflict { .. }) if retries < max_retries => {
                    retries += 1;
                    warn!(
                        "Mint hit a sequence conflict ({}), rebuilding (retry {}/{})",
                        e, retries, max_retries
                    );
                }
                result => return result,
            }
        }
    }

    async fn execute_inner<C: RpcConnection + Indexer>(
        &self,
        client: &C,
        payer: &Keypair,
        deadline: Option<Instant>,
    ) -> Result<MintOutcome, MintError> {
        let mut attempt = MintAttempt::new();
        let instructions = self.instructions(&payer.pubkey())?;

        let recent_blockhash = match deadline {
            Some(deadline) => timeout_at(deadline, client.get_latest_blockhash())
                .await
                .map_err(|_| {
                    MintError::TransientQueryError("blockhash not fetched by the deadline".into())
                })??,
            None => client.get_latest_blockhash().await?,
        };
        let transaction = build_signed_transaction(&instructions, payer, recent_blockhash);
        let signature = record_signature(&transaction, &mut attempt)?;

        let slot = match send_and_confirm(
            client,
            &transaction,
            &mut attempt,
            &self.confirmation,
            deadline,
        )
        .await
        {
            Ok(slot) => slot,
            Err(e) => {
                error!("Mint {} failed: {}", signature, e);
                return Err(e);
            }
        };

        let leaf_index = self.read_leaf_index(client, &signature).await;
        let asset_id =
            leaf_index.map(|index| get_asset_id(&self.tree.merkle_tree, u64::from(index)));
        match asset_id {
            Some(asset_id) => info!(
                "Minted asset {} at leaf {:?} of tree {}",
                asset_id, leaf_index, self.tree.merkle_tree
            ),
            None => info!("Minted into tree {} with {}", self.tree.merkle_tree, signature),
        }

        Ok(MintOutcome {
            signature,
            slot,
            leaf_index,
            asset_id,
        })
    }

    async fn read_leaf_index<C: RpcConnection>(
        &self,
        client: &C,
        signature: &Signature,
    ) -> Option<u32> {
        let meta = match client.get_transaction_meta(signature).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Could not fetch transaction {} for leaf index: {}", signature, e);
                return None;
            }
        };
        let leaf_index = find_leaf_index(&meta.inner_instructions, &self.tree.merkle_tree);
        if leaf_index.is_none() {
            warn!(
                "No change log for tree {} in transaction {}",
                self.tree.merkle_tree, signature
            );
        }
        leaf_index
    }

    /// Leaf bubblegum appends for this mint at `leaf_index`. The program
    /// marks the collection verified before hashing.
    pub fn expected_leaf(&self, payer: &Pubkey, leaf_index: u32) -> Result<LeafSchema, MintError> {
        let mut metadata = self.prepared_metadata(payer)?;
        metadata.collection = Some(Collection {
            verified: true,
            key: self.collection.mint,
        });
        LeafSchema::from_metadata(
            &metadata,
            &self.tree.merkle_tree,
            u64::from(leaf_index),
            self.leaf_owner,
            self.leaf_owner,
        )
        .map_err(MintError::InvalidMetadata)
    }

    /// Waits for the indexer to serve a proof of the minted leaf and checks
    /// that it proves the leaf this mint produced.
    pub async fn wait_for_proof<I: Indexer + ?Sized>(
        &self,
        indexer: &I,
        payer: &Pubkey,
        outcome: &MintOutcome,
        retry_config: RetryConfig,
    ) -> Result<AssetProof, MintError> {
        let (Some(leaf_index), Some(asset_id)) = (outcome.leaf_index, outcome.asset_id) else {
            return Err(MintError::TransientQueryError(format!(
                "leaf index of {} unknown, cannot locate the asset",
                outcome.signature
            )));
        };
        let proof = wait_for_asset_proof(indexer, &asset_id, retry_config).await?;

        let expected = self.expected_leaf(payer, leaf_index)?.hash();
        if proof.leaf != expected || proof.tree_id != self.tree.merkle_tree {
            return Err(MintError::TransientQueryError(format!(
                "indexer proof for {} does not match the minted leaf",
                asset_id
            )));
        }
        if proof.leaf_index()? != leaf_index {
            return Err(MintError::TransientQueryError(format!(
                "indexer places {} at a different leaf index",
                asset_id
            )));
        }
        Ok(proof)
    }
}
