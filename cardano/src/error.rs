use dashu_int::IBig;
use minter_codec::CodecError;
use minter_common::{Address, asset::AssetError};
use thiserror::Error;

use crate::{backend::BackendError, fee::FeeError};

/// Ways a transaction build can fail
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Primary funding found nothing to spend
    #[error("No spendable UTXOs at {address} for {required} lovelace")]
    InsufficientBalance { address: Address, required: u64 },

    /// Top-up ran out of UTXOs before the change output met its minimum
    #[error("Change output needs {required} lovelace but holds {available}")]
    DepositShortfall { required: u64, available: IBig },

    #[error("Cannot serialise transaction: {0}")]
    Codec(#[from] CodecError),

    #[error("Cannot price transaction: {0}")]
    Fee(#[from] FeeError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}
