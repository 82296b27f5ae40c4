//! Transactions coming back from a payer's wallet. The body and auxiliary
//! data are kept byte-for-byte so that the transaction id, and so every
//! signature already made over it, stays valid.

use minicbor::{Decoder, data::Type};
use minter_common::{
    crypto::SigningKey,
    hash::TxHash,
    tx::{VKeyWitness, WitnessSet},
};
use pallas::ledger::traverse::MultiEraTx;
use tracing::debug;

use crate::{
    error::CodecError,
    tx::{assemble, transaction_id},
    witness::read_witness_set,
};

#[derive(Debug, Clone)]
pub struct SubmittedTransaction {
    body: Vec<u8>,
    pub witnesses: WitnessSet,
    pub is_valid: bool,
    auxiliary_data: Option<Vec<u8>>,
}

impl SubmittedTransaction {
    pub fn from_hex(text: &str) -> Result<Self, CodecError> {
        Self::from_bytes(&hex::decode(text.trim())?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut d = Decoder::new(bytes);
        if d.array()? != Some(4) {
            return Err(CodecError::Decode(minicbor::decode::Error::message(
                "expected a four element transaction",
            )));
        }

        let start = d.position();
        d.skip()?;
        let body = bytes[start..d.position()].to_vec();

        let witnesses = read_witness_set(&mut d, bytes)?;
        let is_valid = d.bool()?;

        let auxiliary_data = if d.datatype()? == Type::Null {
            d.null()?;
            None
        } else {
            let start = d.position();
            d.skip()?;
            Some(bytes[start..d.position()].to_vec())
        };

        if d.position() != bytes.len() {
            return Err(CodecError::Decode(minicbor::decode::Error::message(
                "trailing bytes after transaction",
            )));
        }

        Ok(Self {
            body,
            witnesses,
            is_valid,
            auxiliary_data,
        })
    }

    pub fn id(&self) -> TxHash {
        transaction_id(&self.body)
    }

    /// Add (or replace) this key's witness over the unchanged body
    pub fn sign(&mut self, key: &SigningKey) {
        let id = self.id();
        debug!("Signing {id} with key {}", key.key_hash());
        self.witnesses.add_vkey(VKeyWitness::create(key, &id));
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        assemble(&self.body, &self.witnesses, self.is_valid, self.auxiliary_data.as_deref())
    }
}

/// Check that the ledger's own decoder accepts the bytes and return the id
/// it computes
pub fn ledger_check(bytes: &[u8]) -> Result<TxHash, CodecError> {
    let parsed = MultiEraTx::decode(bytes).map_err(|e| CodecError::Ledger(e.to_string()))?;
    Ok(TxHash::from(*parsed.hash()))
}
