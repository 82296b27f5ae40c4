/// The protocol parameters a transaction build depends on, snapshotted once
/// per build
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProtocolParams {
    /// Fee per byte of serialised transaction
    pub min_fee_a: u64,

    /// Constant fee per transaction
    pub min_fee_b: u64,

    /// Largest serialised transaction the ledger accepts
    pub max_tx_size: u64,

    /// Babbage minimum deposit rate
    pub coins_per_utxo_byte: u64,
}

impl Default for ProtocolParams {
    /// Mainnet values at the start of the Conway era
    fn default() -> Self {
        Self {
            min_fee_a: 44,
            min_fee_b: 155381,
            max_tx_size: 16384,
            coins_per_utxo_byte: 4310,
        }
    }
}
