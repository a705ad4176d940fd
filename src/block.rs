//! Block envelope as returned by `/chains/main/blocks/{id}`

use crate::numeric::DecimalString;
use crate::operation::{BalanceUpdate, Contents};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One decoded block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub protocol: String,
    pub chain_id: String,
    pub hash: String,
    pub header: Header,
    pub metadata: Metadata,
    /// Operation groups, one list per validation pass.
    pub operations: Vec<Vec<OperationGroup>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn level(&self) -> i64 {
        self.header.level
    }

    /// Group hashes in validation pass order, then in-pass order.
    pub fn operation_hashes(&self) -> Vec<String> {
        self.operations
            .iter()
            .flatten()
            .map(|group| group.hash.clone())
            .collect()
    }

    /// Every contents entry of the block in wire order.
    pub fn contents(&self) -> impl Iterator<Item = &Contents> {
        self.operations
            .iter()
            .flatten()
            .flat_map(|group| group.contents.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub level: i64,
    pub proto: u32,
    pub predecessor: String,
    pub timestamp: DateTime<Utc>,
    pub validation_pass: u32,
    pub operations_hash: String,
    pub fitness: Vec<String>,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_work_nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_nonce_hash: Option<String>,
    pub signature: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Facts computed by the node while applying the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub protocol: String,
    pub next_protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_chain_status: Option<TestChainStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_operations_ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_operation_data_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_block_header_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_operation_list_length: Option<Vec<MaxOperationListLength>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_period_kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "NonceHash::deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub nonce_hash: Option<NonceHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_gas: Option<DecimalString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_updates: Option<Vec<BalanceUpdate>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestChainStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genesis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxOperationListLength {
    pub max_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_op: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Position of a level within cycles and voting periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub level: i64,
    pub level_position: i64,
    pub cycle: i64,
    pub cycle_position: i64,
    pub voting_period: i64,
    pub voting_period_position: i64,
    pub expected_commitment: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The block's `nonce_hash` metadata entry.
///
/// The node sends `null` for most blocks and a nonce hash string when a
/// commitment is expected. Any other shape is kept untouched in `Raw`. A
/// missing key is represented by the enclosing `Option` being `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum NonceHash {
    Null,
    Hash(String),
    Raw(Value),
}

impl NonceHash {
    pub fn as_hash(&self) -> Option<&str> {
        match self {
            NonceHash::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    // Keeps an explicit `null` distinct from an absent key.
    fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<NonceHash>, D::Error>
    where
        D: Deserializer<'de>,
    {
        NonceHash::deserialize(deserializer).map(Some)
    }
}

impl From<Value> for NonceHash {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => NonceHash::Null,
            Value::String(hash) => NonceHash::Hash(hash),
            other => NonceHash::Raw(other),
        }
    }
}

impl<'de> Deserialize<'de> for NonceHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(NonceHash::from)
    }
}

impl Serialize for NonceHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            NonceHash::Null => serializer.serialize_unit(),
            NonceHash::Hash(hash) => serializer.serialize_str(hash),
            NonceHash::Raw(value) => value.serialize(serializer),
        }
    }
}

/// One signed operation envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationGroup {
    pub protocol: String,
    pub chain_id: String,
    pub hash: String,
    pub branch: String,
    pub contents: Vec<Contents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
