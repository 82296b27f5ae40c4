use std::convert::Infallible;

use dashu_int::IBig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Output coin {0} is negative")]
    NegativeCoin(IBig),

    #[error("Quantity {0} does not fit in 64 bits")]
    QuantityOverflow(String),

    #[error("Malformed transaction: {0}")]
    Decode(#[from] minicbor::decode::Error),

    #[error("Malformed witness set: {0}")]
    Witness(String),

    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Transaction rejected by ledger decoder: {0}")]
    Ledger(String),

    #[error("Encoding failed: {0}")]
    Encode(String),
}

// Encoding into a Vec cannot fail
impl From<minicbor::encode::Error<Infallible>> for CodecError {
    fn from(error: minicbor::encode::Error<Infallible>) -> Self {
        CodecError::Encode(error.to_string())
    }
}
