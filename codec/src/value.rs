use dashu_int::{IBig, UBig};
use minicbor::Encoder;
use minter_common::{
    asset::{NativeAssets, Value},
    tx::TransactionOutput,
};

use crate::error::CodecError;

pub(crate) fn coin(value: &IBig) -> Result<u64, CodecError> {
    if *value < IBig::ZERO {
        return Err(CodecError::NegativeCoin(value.clone()));
    }
    u64::try_from(value.clone()).map_err(|_| CodecError::QuantityOverflow(value.to_string()))
}

pub(crate) fn quantity(value: &UBig) -> Result<u64, CodecError> {
    u64::try_from(value.clone()).map_err(|_| CodecError::QuantityOverflow(value.to_string()))
}

/// `{ policy_id => { asset_name => uint } }`
pub(crate) fn write_multiasset(
    e: &mut Encoder<Vec<u8>>,
    assets: &NativeAssets,
) -> Result<(), CodecError> {
    e.map(assets.len() as u64)?;
    for (policy, bundle) in assets {
        e.bytes(policy.as_ref())?.map(bundle.len() as u64)?;
        for asset in bundle {
            e.bytes(asset.name.as_slice())?.u64(quantity(&asset.amount)?)?;
        }
    }
    Ok(())
}

/// Plain coin when there are no assets, `[coin, multiasset]` otherwise
pub(crate) fn write_value(e: &mut Encoder<Vec<u8>>, value: &Value) -> Result<(), CodecError> {
    let coin = coin(&value.coin)?;
    if value.has_assets() {
        e.array(2)?.u64(coin)?;
        write_multiasset(e, &value.assets)?;
    } else {
        e.u64(coin)?;
    }
    Ok(())
}

/// Post-Alonzo map form `{ 0: address, 1: value }`
pub(crate) fn write_output(
    e: &mut Encoder<Vec<u8>>,
    output: &TransactionOutput,
) -> Result<(), CodecError> {
    e.map(2)?.u8(0)?.bytes(output.address.as_bytes())?.u8(1)?;
    write_value(e, &output.value)
}

/// CBOR of a single output
pub fn encode_output(output: &TransactionOutput) -> Result<Vec<u8>, CodecError> {
    let mut e = Encoder::new(Vec::new());
    write_output(&mut e, output)?;
    Ok(e.into_writer())
}
