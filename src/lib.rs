//! tezblock - typed block retrieval for Tezos node RPC endpoints
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Data Model
//! - [`block`] - Block, header and metadata records
//! - [`operation`] - Operation contents, one variant per kind
//! - [`numeric`] - Arbitrary-precision decimal text
//!
//! ## Retrieval
//! - [`block_id`] - Block identifier resolution (level or hash)
//! - [`client`] - Head block, block and operation hash retrieval
//! - [`transport`] - Transport trait and HTTP implementation
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`logging`] - Tracing subscriber setup

#![forbid(unsafe_code)]

// ============================================================================
// Data Model
// ============================================================================
pub mod block;
pub mod numeric;
pub mod operation;

// ============================================================================
// Retrieval
// ============================================================================
pub mod block_id;
pub mod client;
pub mod transport;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
pub mod logging;

pub use block::{Block, Header, Level, Metadata, NonceHash, OperationGroup};
pub use block_id::{resolve, BlockId, IntoBlockId};
pub use client::Client;
pub use error::{IdentifierError, Result, RpcError, TransportError};
pub use numeric::DecimalString;
pub use operation::{Contents, OperationKind};
pub use transport::{HttpTransport, Transport};
