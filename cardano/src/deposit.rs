//! Minimum coin an output must carry

use minter_codec::{CodecError, encode_output};
use minter_common::{ProtocolParams, tx::TransactionOutput};

/// Fixed per-entry overhead the ledger adds to an output's serialized size
const UTXO_ENTRY_OVERHEAD: u64 = 160;

pub trait DepositCalculator: Send + Sync {
    /// Minimum lovelace for `output`, depending on its shape only
    fn minimum_deposit(
        &self,
        output: &TransactionOutput,
        params: &ProtocolParams,
    ) -> Result<u64, CodecError>;
}

/// Babbage rule: `(160 + |output|) * coins_per_utxo_byte`
#[derive(Debug, Default, Clone, Copy)]
pub struct BabbageDepositCalculator;

impl DepositCalculator for BabbageDepositCalculator {
    fn minimum_deposit(
        &self,
        output: &TransactionOutput,
        params: &ProtocolParams,
    ) -> Result<u64, CodecError> {
        // Size the coin at its widest encoding so the coin amount cannot
        // change the result
        let mut sized = output.clone();
        sized.value.coin = u64::MAX.into();
        sized.value.prune();

        let size = encode_output(&sized)?.len() as u64;
        Ok((UTXO_ENTRY_OVERHEAD + size).saturating_mul(params.coins_per_utxo_byte))
    }
}
