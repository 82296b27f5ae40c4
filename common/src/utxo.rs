//! Unspent outputs as fetched from the chain backend

use std::fmt;

use dashu_int::UBig;

use crate::{
    address::Address,
    asset::{AssetUnit, LOVELACE_UNIT},
    hash::{DatumHash, TxHash},
};

/// Identity of an unspent output: producing transaction and output index
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct UTxOIdentifier {
    pub tx_hash: TxHash,
    pub output_index: u32,
}

impl UTxOIdentifier {
    pub fn new(tx_hash: TxHash, output_index: u32) -> Self {
        Self {
            tx_hash,
            output_index,
        }
    }
}

impl fmt::Display for UTxOIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tx_hash, self.output_index)
    }
}

/// A (unit, quantity) pair in backend form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    pub unit: String,
    pub quantity: UBig,
}

impl Amount {
    pub fn lovelace(quantity: u64) -> Self {
        Self {
            unit: LOVELACE_UNIT.to_string(),
            quantity: UBig::from(quantity),
        }
    }

    pub fn native(unit: &AssetUnit, quantity: u64) -> Self {
        Self {
            unit: unit.to_string(),
            quantity: UBig::from(quantity),
        }
    }

    pub fn is_lovelace(&self) -> bool {
        self.unit == LOVELACE_UNIT
    }
}

/// Unspent output, never mutated once fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub id: UTxOIdentifier,
    pub address: Address,
    pub amounts: Vec<Amount>,
    pub data_hash: Option<DatumHash>,
}

impl Utxo {
    /// Quantity held for the given unit, if any entry matches
    pub fn quantity_of(&self, unit: &str) -> Option<&UBig> {
        self.amounts.iter().find(|a| a.unit == unit).map(|a| &a.quantity)
    }

    /// True when every amount is base currency
    pub fn is_base_currency_only(&self) -> bool {
        self.amounts.iter().all(Amount::is_lovelace)
    }
}
