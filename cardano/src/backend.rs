//! Chain backend: where UTXOs, parameters and the tip come from, and where
//! transactions go

use async_trait::async_trait;
use minter_common::{Address, ProtocolParams, TxHash, Utxo};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status
    #[error("Backend returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Backend transport error: {0}")]
    Transport(String),

    #[error("Cannot decode backend response: {0}")]
    Decode(String),
}

/// Sort order of paged UTXO listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Chain backend
/// Note all methods immutable; implementations hold any state internally
#[async_trait]
pub trait ChainBackend: Send + Sync {
    /// One page (1-based) of `count` UTXOs at `address`, in a stable order
    async fn fetch_utxos(
        &self,
        address: &Address,
        count: usize,
        page: usize,
        order: Order,
    ) -> Result<Vec<Utxo>, BackendError>;

    /// Current protocol parameters
    async fn fetch_protocol_parameters(&self) -> Result<ProtocolParams, BackendError>;

    /// Slot of the chain tip
    async fn fetch_tip_slot(&self) -> Result<u64, BackendError>;

    /// Submit a signed transaction, returning its id
    async fn submit_transaction(&self, cbor: &[u8]) -> Result<TxHash, BackendError>;
}
