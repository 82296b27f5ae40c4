//! Transaction model the builder assembles and the codec encodes

use crate::{
    address::Address,
    asset::{NativeAssets, Value},
    crypto::{Signature, SigningKey, VerificationKey},
    hash::{AuxiliaryDataHash, TxHash},
    metadata::Metadata,
    script::NativeScript,
    utxo::UTxOIdentifier,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub address: Address,
    pub value: Value,
}

impl TransactionOutput {
    pub fn new(address: Address, value: Value) -> Self {
        Self { address, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionBody {
    pub inputs: Vec<UTxOIdentifier>,
    pub outputs: Vec<TransactionOutput>,
    pub fee: u64,
    pub ttl: Option<u64>,
    pub auxiliary_data_hash: Option<AuxiliaryDataHash>,
    /// Minted quantities; burning is not supported
    pub mint: NativeAssets,
}

/// Signature of a verification key over a transaction id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VKeyWitness {
    pub vkey: VerificationKey,
    pub signature: Signature,
}

impl VKeyWitness {
    pub fn create(key: &SigningKey, tx_id: &TxHash) -> Self {
        Self {
            vkey: key.verification_key(),
            signature: key.sign(tx_id.as_ref()),
        }
    }

    pub fn verifies(&self, tx_id: &TxHash) -> bool {
        self.vkey.verify(tx_id.as_ref(), &self.signature)
    }
}

/// Witness set entries the minter writes. Anything else found in a decoded
/// witness set is carried through untouched as raw CBOR, keyed by its map key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WitnessSet {
    pub vkeys: Vec<VKeyWitness>,
    pub native_scripts: Vec<NativeScript>,
    pub other: Vec<(u64, Vec<u8>)>,
}

impl WitnessSet {
    /// Add a vkey witness, replacing any existing witness of the same key
    pub fn add_vkey(&mut self, witness: VKeyWitness) {
        match self.vkeys.iter_mut().find(|w| w.vkey == witness.vkey) {
            Some(existing) => *existing = witness,
            None => self.vkeys.push(witness),
        }
    }

    pub fn remove_vkey(&mut self, vkey: &VerificationKey) {
        self.vkeys.retain(|w| w.vkey != *vkey);
    }

    pub fn has_vkey(&self, vkey: &VerificationKey) -> bool {
        self.vkeys.iter().any(|w| w.vkey == *vkey)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub body: TransactionBody,
    pub witnesses: WitnessSet,
    pub is_valid: bool,
    pub metadata: Option<Metadata>,
}

impl Transaction {
    pub fn new(body: TransactionBody) -> Self {
        Self {
            body,
            witnesses: WitnessSet::default(),
            is_valid: true,
            metadata: None,
        }
    }
}
