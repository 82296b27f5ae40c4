//! Transaction fee calculation

use minter_codec::{CodecError, encode_transaction};
use minter_common::{ProtocolParams, tx::Transaction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeeError {
    #[error("Transaction of {size} bytes exceeds the maximum of {max}")]
    TooLarge { size: u64, max: u64 },

    /// The fee kept changing the size it pays for
    #[error("Fee did not settle after {rounds} rounds")]
    Unstable { rounds: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub trait FeeCalculator: Send + Sync {
    /// Fee for `tx` exactly as it would be submitted, witnesses included
    fn calculate_fee(&self, tx: &Transaction, params: &ProtocolParams) -> Result<u64, FeeError>;
}

/// Shelley linear fee: `min_fee_a * size + min_fee_b`
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearFeeCalculator;

impl FeeCalculator for LinearFeeCalculator {
    fn calculate_fee(&self, tx: &Transaction, params: &ProtocolParams) -> Result<u64, FeeError> {
        let size = encode_transaction(tx)?.len() as u64;
        if size > params.max_tx_size {
            return Err(FeeError::TooLarge {
                size,
                max: params.max_tx_size,
            });
        }
        Ok(params.min_fee_a.saturating_mul(size).saturating_add(params.min_fee_b))
    }
}
