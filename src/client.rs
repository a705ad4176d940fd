//! Block retrieval operations
//!
//! Each operation builds an RPC path, asks the [`Transport`] for the body and
//! decodes it. Failures are wrapped with a message naming the operation; the
//! transport error and the decode error get different messages so callers can
//! tell them apart without inspecting the cause.

use crate::block::Block;
use crate::block_id::IntoBlockId;
use crate::config::NodeConfig;
use crate::error::{Result, RpcError, TransportError};
use crate::transport::{HttpTransport, Transport};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const HEAD_BLOCK_PATH: &str = "/chains/main/blocks/head";

pub fn block_path(segment: &str) -> String {
    format!("/chains/main/blocks/{}", segment)
}

pub fn operation_hashes_path(block_hash: &str) -> String {
    format!("/chains/main/blocks/{}/operation_hashes", block_hash)
}

/// Stateless handle over a [`Transport`].
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn from_transport<T: Transport + 'static>(transport: T) -> Self {
        Self::new(Arc::new(transport))
    }

    /// Client over HTTP for the configured node.
    pub fn from_config(config: &NodeConfig) -> std::result::Result<Self, TransportError> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::from_transport(transport))
    }

    /// Fetch the current head block.
    pub async fn head_block(&self) -> Result<Block> {
        self.fetch(
            HEAD_BLOCK_PATH,
            "could not get head block",
            "could not decode head block",
        )
        .await
    }

    /// Fetch a block by level or hash.
    pub async fn block<I: IntoBlockId>(&self, id: I) -> Result<Block> {
        let id = id.into_block_id().map_err(|source| {
            warn!("rejected block identifier: {}", source);
            RpcError::InvalidIdentifier {
                context: "could not get block".to_string(),
                source,
            }
        })?;

        self.fetch(
            &block_path(&id.path_segment()),
            format!("could not get block '{}'", id),
            format!("could not decode block '{}'", id),
        )
        .await
    }

    /// Hashes of the operations included in a block, in inclusion order.
    pub async fn operation_hashes(&self, block_hash: &str) -> Result<Vec<String>> {
        let hashes: OperationHashes = self
            .fetch(
                &operation_hashes_path(block_hash),
                format!("could not get operation hashes for block '{}'", block_hash),
                format!("could not decode operation hashes for block '{}'", block_hash),
            )
            .await?;
        Ok(hashes.into_flat())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        get_context: impl Into<String>,
        decode_context: impl Into<String>,
    ) -> Result<T> {
        debug!("fetching {}", path);

        let body = self.transport.get(path).await.map_err(|source| {
            let context = get_context.into();
            warn!("{}: {}", context, source);
            RpcError::Transport { context, source }
        })?;

        serde_json::from_slice(&body).map_err(|source| {
            let context = decode_context.into();
            warn!("{}: {}", context, source);
            RpcError::Decode { context, source }
        })
    }
}

/// The node groups hashes per validation pass; a flat list is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum OperationHashes {
    Flat(Vec<String>),
    ByPass(Vec<Vec<String>>),
}

impl OperationHashes {
    fn into_flat(self) -> Vec<String> {
        match self {
            OperationHashes::Flat(hashes) => hashes,
            OperationHashes::ByPass(passes) => passes.into_iter().flatten().collect(),
        }
    }
}
