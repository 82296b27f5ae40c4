use minicbor::{Decoder, Encoder, data::Type};
use minter_common::{
    crypto::{Signature, VerificationKey},
    script::NativeScript,
    tx::{VKeyWitness, WitnessSet},
};

use crate::error::CodecError;

const VKEY_WITNESSES: u64 = 0;
const NATIVE_SCRIPTS: u64 = 1;

/// Tag for sets in the Conway encoding, optional on the wire
const SET_TAG: u64 = 258;

pub(crate) fn write_witness_set(
    e: &mut Encoder<Vec<u8>>,
    witnesses: &WitnessSet,
) -> Result<(), CodecError> {
    let entries = usize::from(!witnesses.vkeys.is_empty())
        + usize::from(!witnesses.native_scripts.is_empty())
        + witnesses.other.len();
    e.map(entries as u64)?;

    if !witnesses.vkeys.is_empty() {
        e.u64(VKEY_WITNESSES)?.array(witnesses.vkeys.len() as u64)?;
        for witness in &witnesses.vkeys {
            e.array(2)?.bytes(witness.vkey.as_ref())?.bytes(witness.signature.as_ref())?;
        }
    }

    if !witnesses.native_scripts.is_empty() {
        e.u64(NATIVE_SCRIPTS)?.array(witnesses.native_scripts.len() as u64)?;
        for script in &witnesses.native_scripts {
            e.encode(script)?;
        }
    }

    for (key, raw) in &witnesses.other {
        e.u64(*key)?;
        e.writer_mut().extend_from_slice(raw);
    }
    Ok(())
}

/// Length of a definite set, with or without the set tag
fn set_len(d: &mut Decoder) -> Result<u64, CodecError> {
    if d.datatype()? == Type::Tag {
        let tag = d.tag()?;
        if tag.as_u64() != SET_TAG {
            return Err(CodecError::Witness(format!("unexpected tag {}", tag.as_u64())));
        }
    }
    d.array()?.ok_or_else(|| CodecError::Witness("indefinite length set".to_string()))
}

fn read_vkey_witness(d: &mut Decoder) -> Result<VKeyWitness, CodecError> {
    if d.array()? != Some(2) {
        return Err(CodecError::Witness("vkey witness must be a pair".to_string()));
    }
    let vkey = VerificationKey::try_from(d.bytes()?)
        .map_err(|e| CodecError::Witness(format!("vkey: {e}")))?;
    let signature = Signature::try_from(d.bytes()?)
        .map_err(|e| CodecError::Witness(format!("signature: {e}")))?;
    Ok(VKeyWitness { vkey, signature })
}

/// Decode a witness set. Entries other than vkeys and native scripts are
/// kept as raw CBOR so they survive re-encoding.
pub(crate) fn read_witness_set(
    d: &mut Decoder,
    bytes: &[u8],
) -> Result<WitnessSet, CodecError> {
    let entries = d
        .map()?
        .ok_or_else(|| CodecError::Witness("indefinite length witness set".to_string()))?;

    let mut witnesses = WitnessSet::default();
    for _ in 0..entries {
        match d.u64()? {
            VKEY_WITNESSES => {
                for _ in 0..set_len(d)? {
                    witnesses.vkeys.push(read_vkey_witness(d)?);
                }
            }
            NATIVE_SCRIPTS => {
                for _ in 0..set_len(d)? {
                    witnesses.native_scripts.push(d.decode::<NativeScript>()?);
                }
            }
            key => {
                let start = d.position();
                d.skip()?;
                witnesses.other.push((key, bytes[start..d.position()].to_vec()));
            }
        }
    }
    Ok(witnesses)
}
