//! JSON-RPC wire models of the Digital Asset Standard read API.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RpcRequest<T> {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    #[serde(rename = "params")]
    pub parameters: T,
}

impl<T> RpcRequest<T> {
    pub fn new(method: String, parameters: T) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: "1".to_string(),
            method,
            parameters,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// A JSON-RPC response carries either `result` or `error`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResponse<T> {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: serde_json::Value,
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GetAssetParams {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DasAssetProof {
    pub root: String,
    pub proof: Vec<String>,
    pub node_index: u64,
    pub leaf: String,
    pub tree_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DasAsset {
    pub interface: String,
    pub id: String,
    pub content: Option<DasContent>,
    #[serde(default)]
    pub authorities: Vec<DasAuthority>,
    pub compression: Option<DasCompression>,
    #[serde(default)]
    pub grouping: Vec<DasGrouping>,
    pub royalty: Option<DasRoyalty>,
    #[serde(default)]
    pub creators: Vec<DasCreator>,
    pub ownership: DasOwnership,
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub burnt: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DasContent {
    #[serde(default)]
    pub json_uri: String,
    #[serde(default)]
    pub metadata: DasMetadata,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DasMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DasAuthority {
    pub address: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DasCompression {
    #[serde(default)]
    pub eligible: bool,
    pub compressed: bool,
    pub data_hash: String,
    pub creator_hash: String,
    pub asset_hash: String,
    pub tree: String,
    pub seq: u64,
    pub leaf_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DasGrouping {
    pub group_key: String,
    pub group_value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DasRoyalty {
    #[serde(default)]
    pub royalty_model: String,
    pub target: Option<String>,
    #[serde(default)]
    pub percent: f64,
    pub basis_points: u16,
    #[serde(default)]
    pub primary_sale_happened: bool,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DasCreator {
    pub address: String,
    pub share: u8,
    pub verified: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DasOwnership {
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub delegated: bool,
    pub delegate: Option<String>,
    #[serde(default)]
    pub ownership_model: String,
    pub owner: String,
}
