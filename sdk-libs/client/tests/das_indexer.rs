use cnft_client::{
    indexer::{Base58Conversions, DasIndexer, Indexer, IndexerError, IndexerRpcConfig, RetryConfig},
    wait_for_asset_proof,
};
use solana_sdk::{keccak, pubkey::Pubkey};
use wiremock::{
    matchers::{body_partial_json, method, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn fast_retry(num_retries: u32) -> RetryConfig {
    RetryConfig {
        num_retries,
        delay_ms: 1,
        max_delay_ms: 2,
    }
}

fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    keccak::hashv(&[&left[..], &right[..]]).to_bytes()
}

/// Proof of leaf 1 in a depth-2 tree with leaves [1; 32]..[4; 32].
fn proof_json(tree: &Pubkey, valid: bool) -> serde_json::Value {
    let leaves: Vec<[u8; 32]> = (1u8..=4).map(|i| [i; 32]).collect();
    let left = hash_pair(&leaves[0], &leaves[1]);
    let right = hash_pair(&leaves[2], &leaves[3]);
    let root = if valid {
        hash_pair(&left, &right)
    } else {
        [0u8; 32]
    };
    serde_json::json!({
        "root": root.to_base58(),
        "proof": [leaves[0].to_base58(), right.to_base58()],
        "node_index": 5,
        "leaf": leaves[1].to_base58(),
        "tree_id": tree.to_string()
    })
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": "1"
    }))
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "jsonrpc": "2.0",
        "error": { "code": -32000, "message": "Asset Proof Not Found" },
        "id": "1"
    }))
}

#[tokio::test]
async fn test_get_asset_proof_sends_das_request() {
    let mock_server = MockServer::start().await;
    let asset_id = Pubkey::new_unique();
    let tree = Pubkey::new_unique();

    Mock::given(method("POST"))
        .and(query_param("api-key", "TEST_KEY"))
        .and(body_partial_json(serde_json::json!({
            "jsonrpc": "2.0",
            "method": "getAssetProof",
            "params": { "id": asset_id.to_string() }
        })))
        .respond_with(ok(proof_json(&tree, true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let indexer = DasIndexer::new(mock_server.uri(), Some("TEST_KEY".to_string()));
    let proof = indexer.get_asset_proof(&asset_id, None).await.unwrap();

    assert_eq!(proof.tree_id, tree);
    assert_eq!(proof.depth(), 2);
    assert_eq!(proof.leaf_index().unwrap(), 1);
    assert!(proof.verify());
}

#[tokio::test]
async fn test_get_asset_decodes_fields() {
    let mock_server = MockServer::start().await;
    let asset_id = Pubkey::new_unique();
    let owner = Pubkey::new_unique();
    let creator = Pubkey::new_unique();
    let collection = Pubkey::new_unique();
    let tree = Pubkey::new_unique();
    let data_hash = [1u8; 32].to_base58();
    let creator_hash = [2u8; 32].to_base58();
    let asset_hash = [3u8; 32].to_base58();

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({ "method": "getAsset" })))
        .respond_with(ok(serde_json::json!({
            "interface": "V1_NFT",
            "id": asset_id.to_string(),
            "content": {
                "$schema": "https://schema.metaplex.com/nft1.0.json",
                "json_uri": "https://example.com/nft.json",
                "files": [],
                "metadata": { "name": "NFT Send Game", "symbol": "SSNC" }
            },
            "authorities": [{ "address": owner.to_string(), "scopes": ["full"] }],
            "compression": {
                "eligible": false,
                "compressed": true,
                "data_hash": data_hash,
                "creator_hash": creator_hash,
                "asset_hash": asset_hash,
                "tree": tree.to_string(),
                "seq": 7,
                "leaf_id": 6
            },
            "grouping": [{ "group_key": "collection", "group_value": collection.to_string() }],
            "royalty": {
                "royalty_model": "creators",
                "target": null,
                "percent": 0.01,
                "basis_points": 100,
                "primary_sale_happened": false,
                "locked": false
            },
            "creators": [{ "address": creator.to_string(), "share": 100, "verified": false }],
            "ownership": {
                "frozen": false,
                "delegated": false,
                "delegate": null,
                "ownership_model": "single",
                "owner": owner.to_string()
            },
            "supply": null,
            "mutable": true,
            "burnt": false
        })))
        .mount(&mock_server)
        .await;

    let indexer = DasIndexer::new(mock_server.uri(), None);
    let asset = indexer.get_asset(&asset_id, None).await.unwrap();

    assert_eq!(asset.id, asset_id);
    assert_eq!(asset.name, "NFT Send Game");
    assert_eq!(asset.symbol, "SSNC");
    assert_eq!(asset.uri, "https://example.com/nft.json");
    assert_eq!(asset.owner, owner);
    assert_eq!(asset.delegate, None);
    assert_eq!(asset.royalty_basis_points, 100);
    assert_eq!(asset.collection, Some(collection));
    assert_eq!(asset.creators.len(), 1);
    assert_eq!(asset.creators[0].address, creator);
    let compression = asset.compression.unwrap();
    assert_eq!(compression.tree, tree);
    assert_eq!(compression.leaf_id, 6);
    assert!(asset.mutable);
}

#[tokio::test]
async fn test_not_found_is_not_retried_by_default() {
    let mock_server = MockServer::start().await;
    let asset_id = Pubkey::new_unique();

    Mock::given(method("POST"))
        .respond_with(not_found())
        .expect(1)
        .mount(&mock_server)
        .await;

    let indexer = DasIndexer::new(mock_server.uri(), None);
    let config = IndexerRpcConfig::new(fast_retry(5));
    let result = indexer.get_asset_proof(&asset_id, Some(config)).await;

    assert_eq!(result, Err(IndexerError::AssetNotFound(asset_id.to_string())));
}

#[tokio::test]
async fn test_server_error_is_retried_then_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let indexer = DasIndexer::new(mock_server.uri(), None);
    let config = IndexerRpcConfig::new(fast_retry(3));
    let result = indexer
        .get_asset_proof(&Pubkey::new_unique(), Some(config))
        .await;

    assert!(matches!(result, Err(IndexerError::Transient(_))));
}

#[tokio::test]
async fn test_malformed_payload_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ok(serde_json::json!({ "root": 42 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let indexer = DasIndexer::new(mock_server.uri(), None);
    let result = indexer
        .get_asset_proof(&Pubkey::new_unique(), Some(IndexerRpcConfig::new(fast_retry(3))))
        .await;

    assert!(matches!(result, Err(IndexerError::InvalidResponseData(_))));
}

#[tokio::test]
async fn test_wait_for_asset_proof_after_mint() {
    let mock_server = MockServer::start().await;
    let asset_id = Pubkey::new_unique();
    let tree = Pubkey::new_unique();

    // Indexer has not caught up, then serves a stale proof, then a good one.
    Mock::given(method("POST"))
        .respond_with(not_found())
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ok(proof_json(&tree, false)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ok(proof_json(&tree, true)))
        .mount(&mock_server)
        .await;

    let indexer = DasIndexer::new(mock_server.uri(), None);
    let proof = wait_for_asset_proof(&indexer, &asset_id, fast_retry(10))
        .await
        .unwrap();

    assert!(proof.verify());
    assert_eq!(proof.tree_id, tree);
}

#[tokio::test]
async fn test_wait_for_asset_proof_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(not_found())
        .expect(4)
        .mount(&mock_server)
        .await;

    let indexer = DasIndexer::new(mock_server.uri(), None);
    let result = wait_for_asset_proof(&indexer, &Pubkey::new_unique(), fast_retry(4)).await;

    assert!(matches!(result, Err(IndexerError::AssetNotFound(_))));
}

#[tokio::test]
async fn test_default_asset_id_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(not_found())
        .expect(0)
        .mount(&mock_server)
        .await;

    let indexer = DasIndexer::new(mock_server.uri(), None);
    let result = indexer.get_asset(&Pubkey::default(), None).await;

    assert!(matches!(result, Err(IndexerError::InvalidParameters(_))));
}
