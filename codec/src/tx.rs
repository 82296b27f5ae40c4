use minicbor::Encoder;
use minter_common::{
    crypto::blake2b_256,
    hash::{AuxiliaryDataHash, TxHash},
    metadata::Metadata,
    tx::{Transaction, TransactionBody, WitnessSet},
};

use crate::{
    error::CodecError,
    value::{write_multiasset, write_output},
    witness::write_witness_set,
};

/// CBOR of a transaction body; its hash is the transaction id
pub fn encode_body(body: &TransactionBody) -> Result<Vec<u8>, CodecError> {
    let entries = 3
        + usize::from(body.ttl.is_some())
        + usize::from(body.auxiliary_data_hash.is_some())
        + usize::from(!body.mint.is_empty());

    let mut e = Encoder::new(Vec::new());
    e.map(entries as u64)?;

    e.u8(0)?.array(body.inputs.len() as u64)?;
    for input in &body.inputs {
        e.array(2)?.bytes(input.tx_hash.as_ref())?.u32(input.output_index)?;
    }

    e.u8(1)?.array(body.outputs.len() as u64)?;
    for output in &body.outputs {
        write_output(&mut e, output)?;
    }

    e.u8(2)?.u64(body.fee)?;

    if let Some(ttl) = body.ttl {
        e.u8(3)?.u64(ttl)?;
    }
    if let Some(hash) = &body.auxiliary_data_hash {
        e.u8(7)?.bytes(hash.as_ref())?;
    }
    if !body.mint.is_empty() {
        e.u8(9)?;
        write_multiasset(&mut e, &body.mint)?;
    }

    Ok(e.into_writer())
}

/// Auxiliary data in the plain metadata-map form
pub fn encode_metadata(metadata: &Metadata) -> Result<Vec<u8>, CodecError> {
    let mut e = Encoder::new(Vec::new());
    e.map(metadata.len() as u64)?;
    for (label, metadatum) in metadata {
        e.u64(*label)?.encode(metadatum)?;
    }
    Ok(e.into_writer())
}

pub fn auxiliary_data_hash(metadata: &Metadata) -> Result<AuxiliaryDataHash, CodecError> {
    Ok(blake2b_256(&encode_metadata(metadata)?))
}

pub fn transaction_id(body_bytes: &[u8]) -> TxHash {
    blake2b_256(body_bytes)
}

/// `[body, witness_set, is_valid, auxiliary_data / null]` from already
/// encoded body and auxiliary data
pub(crate) fn assemble(
    body: &[u8],
    witnesses: &WitnessSet,
    is_valid: bool,
    auxiliary_data: Option<&[u8]>,
) -> Result<Vec<u8>, CodecError> {
    let mut e = Encoder::new(Vec::new());
    e.array(4)?;
    e.writer_mut().extend_from_slice(body);
    write_witness_set(&mut e, witnesses)?;
    e.bool(is_valid)?;
    match auxiliary_data {
        Some(raw) => e.writer_mut().extend_from_slice(raw),
        None => {
            e.null()?;
        }
    }
    Ok(e.into_writer())
}

pub fn encode_transaction(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    let body = encode_body(&tx.body)?;
    let auxiliary_data = tx.metadata.as_ref().map(encode_metadata).transpose()?;
    assemble(&body, &tx.witnesses, tx.is_valid, auxiliary_data.as_deref())
}
