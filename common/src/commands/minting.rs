use crate::hash::TxHash;

/// Requests served by the minter module over the message bus
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum MintingCommand {
    /// Build a minting transaction paid for by `payer` (bech32 address)
    CreateTransaction { payer: String, context_id: String },

    /// Add the minter's witnesses to a payer-signed transaction and submit it
    SubmitTransaction { cbor_hex: String, context_id: String },

    /// Has a transaction already been submitted for this context
    AlreadyMinted { context_id: String },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum MintingCommandResponse {
    /// Hex CBOR of the built transaction
    Created { cbor_hex: String },

    /// Transaction id, or none when the backend refused the transaction
    Submitted { id: Option<TxHash> },

    AlreadyMinted(bool),

    Error(String),
}
