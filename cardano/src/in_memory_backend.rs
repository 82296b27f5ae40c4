//! In-memory chain backend using a standard HashMap, for tests

use crate::backend::{BackendError, ChainBackend, Order};
use async_trait::async_trait;
use minter_codec::SubmittedTransaction;
use minter_common::{Address, ProtocolParams, TxHash, Utxo};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::info;

pub struct InMemoryBackend {
    /// UTXOs by address, in listing (ascending) order
    utxos: RwLock<HashMap<Address, Vec<Utxo>>>,

    params: ProtocolParams,

    tip_slot: u64,

    /// Status to answer submissions with, if they should be refused
    reject_status: RwLock<Option<u16>>,

    /// Transactions accepted so far
    submitted: RwLock<Vec<Vec<u8>>>,

    /// Number of UTXO page fetches served
    page_fetches: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new(params: ProtocolParams, tip_slot: u64) -> Self {
        info!("Using in-memory chain backend");

        Self {
            utxos: RwLock::new(HashMap::new()),
            params,
            tip_slot,
            reject_status: RwLock::new(None),
            submitted: RwLock::new(Vec::new()),
            page_fetches: AtomicUsize::new(0),
        }
    }

    /// Add a UTXO at the end of its address's listing
    pub async fn add_utxo(&self, utxo: Utxo) {
        self.utxos.write().await.entry(utxo.address.clone()).or_default().push(utxo);
    }

    /// Refuse later submissions with this HTTP-like status
    pub async fn reject_submissions(&self, status: u16) {
        *self.reject_status.write().await = Some(status);
    }

    pub async fn submitted(&self) -> Vec<Vec<u8>> {
        self.submitted.read().await.clone()
    }

    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainBackend for InMemoryBackend {
    async fn fetch_utxos(
        &self,
        address: &Address,
        count: usize,
        page: usize,
        order: Order,
    ) -> Result<Vec<Utxo>, BackendError> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        if page == 0 {
            return Err(BackendError::Status {
                code: 400,
                body: "page must be at least 1".to_string(),
            });
        }

        let utxos = self.utxos.read().await;
        let mut listing = utxos.get(address).cloned().unwrap_or_default();
        if order == Order::Desc {
            listing.reverse();
        }
        Ok(listing.into_iter().skip((page - 1) * count).take(count).collect())
    }

    async fn fetch_protocol_parameters(&self) -> Result<ProtocolParams, BackendError> {
        Ok(self.params.clone())
    }

    async fn fetch_tip_slot(&self) -> Result<u64, BackendError> {
        Ok(self.tip_slot)
    }

    async fn submit_transaction(&self, cbor: &[u8]) -> Result<TxHash, BackendError> {
        if let Some(code) = *self.reject_status.read().await {
            return Err(BackendError::Status {
                code,
                body: "transaction rejected".to_string(),
            });
        }
        let id = body_id(cbor)?;
        self.submitted.write().await.push(cbor.to_vec());
        Ok(id)
    }
}

/// Malformed transactions are refused the way a real backend would
fn body_id(cbor: &[u8]) -> Result<TxHash, BackendError> {
    let tx = SubmittedTransaction::from_bytes(cbor).map_err(|e| BackendError::Status {
        code: 400,
        body: e.to_string(),
    })?;
    Ok(tx.id())
}
