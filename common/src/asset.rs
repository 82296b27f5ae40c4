use std::{collections::HashMap, fmt, ops::AddAssign, str::FromStr};

use dashu_int::{IBig, UBig};
use thiserror::Error;

use crate::{hash::PolicyId, utxo::Amount};

/// Reserved unit of the base currency
pub const LOVELACE_UNIT: &str = "lovelace";

/// One ADA in lovelace
pub const ONE_ADA: u64 = 1_000_000;

/// Hex length of the policy id prefix of a unit string
const POLICY_ID_HEX_LENGTH: usize = 56;

pub type NativeAssets = Vec<(PolicyId, Vec<NativeAsset>)>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("Invalid asset unit '{0}'")]
    InvalidUnit(String),

    #[error("Asset name longer than 32 bytes")]
    NameTooLong,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AssetName {
    len: u8,
    bytes: [u8; 32],
}

impl AssetName {
    pub fn new(data: &[u8]) -> Result<Self, AssetError> {
        if data.len() > 32 {
            return Err(AssetError::NameTooLong);
        }
        let mut bytes = [0u8; 32];
        bytes[..data.len()].copy_from_slice(data);
        Ok(Self {
            len: data.len() as u8,
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Name as text, if it is valid UTF-8
    pub fn as_utf8(&self) -> Option<&str> {
        std::str::from_utf8(self.as_slice()).ok()
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_slice()))
    }
}

impl fmt::Debug for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_utf8() {
            Some(text) => write!(f, "AssetName({text:?})"),
            None => write!(f, "AssetName({self})"),
        }
    }
}

/// Identifier of a currency as the backend reports it: either the base
/// currency or policy id and asset name concatenated in hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetUnit {
    Lovelace,
    Native { policy: PolicyId, name: AssetName },
}

impl AssetUnit {
    pub fn is_lovelace(&self) -> bool {
        matches!(self, AssetUnit::Lovelace)
    }
}

impl FromStr for AssetUnit {
    type Err = AssetError;

    fn from_str(unit: &str) -> Result<Self, Self::Err> {
        if unit == LOVELACE_UNIT {
            return Ok(AssetUnit::Lovelace);
        }
        let invalid = || AssetError::InvalidUnit(unit.to_string());
        if unit.len() < POLICY_ID_HEX_LENGTH || !unit.is_char_boundary(POLICY_ID_HEX_LENGTH) {
            return Err(invalid());
        }
        let (policy, name) = unit.split_at(POLICY_ID_HEX_LENGTH);
        let policy = policy.parse::<PolicyId>().map_err(|_| invalid())?;
        let name = hex::decode(name).map_err(|_| invalid())?;
        Ok(AssetUnit::Native {
            policy,
            name: AssetName::new(&name)?,
        })
    }
}

impl fmt::Display for AssetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetUnit::Lovelace => f.write_str(LOVELACE_UNIT),
            AssetUnit::Native { policy, name } => write!(f, "{policy}{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAsset {
    pub name: AssetName,
    pub amount: UBig,
}

/// Value (coin + multiasset) of an output under construction.
///
/// The coin is signed so a change output can carry a deficit while it is
/// balanced; it must be non-negative by the time it is encoded.
#[derive(Debug, Clone)]
pub struct Value {
    pub coin: IBig,
    pub assets: NativeAssets,
}

impl Default for Value {
    fn default() -> Self {
        Self {
            coin: IBig::ZERO,
            assets: Vec::new(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.coin != other.coin {
            return false;
        }
        let tally = |value: &Value| {
            let mut counts: HashMap<(PolicyId, AssetName), UBig> = HashMap::new();
            for (policy_id, assets) in &value.assets {
                for asset in assets {
                    *counts.entry((*policy_id, asset.name)).or_insert(UBig::ZERO) +=
                        &asset.amount;
                }
            }
            counts.retain(|_, amount| *amount != UBig::ZERO);
            counts
        };
        tally(self) == tally(other)
    }
}

impl Eq for Value {}

impl Value {
    pub fn new(coin: u64, assets: NativeAssets) -> Self {
        Self {
            coin: IBig::from(coin),
            assets,
        }
    }

    pub fn has_assets(&self) -> bool {
        !self.assets.is_empty()
    }

    /// Quantity of a single native asset, zero when absent
    pub fn asset_quantity(&self, policy: &PolicyId, name: &AssetName) -> UBig {
        self.assets
            .iter()
            .filter(|(pid, _)| pid == policy)
            .flat_map(|(_, assets)| assets.iter())
            .filter(|asset| asset.name == *name)
            .fold(UBig::ZERO, |sum, asset| sum + &asset.amount)
    }

    /// Add a quantity of a native asset, extending an existing bundle or
    /// creating a new one for the policy
    pub fn add_asset(&mut self, policy: PolicyId, name: AssetName, amount: &UBig) {
        match self.assets.iter_mut().find(|(pid, _)| *pid == policy) {
            Some((_, bundle)) => match bundle.iter_mut().find(|a| a.name == name) {
                Some(existing) => existing.amount += amount,
                None => bundle.push(NativeAsset {
                    name,
                    amount: amount.clone(),
                }),
            },
            None => self.assets.push((
                policy,
                vec![NativeAsset {
                    name,
                    amount: amount.clone(),
                }],
            )),
        }
    }

    /// Merge a list of backend amounts into this value, then drop
    /// zero-quantity entries and empty bundles
    pub fn merge_amounts(&mut self, amounts: &[Amount]) -> Result<(), AssetError> {
        for amount in amounts {
            match amount.unit.parse::<AssetUnit>()? {
                AssetUnit::Lovelace => self.coin += IBig::from(amount.quantity.clone()),
                AssetUnit::Native { policy, name } => {
                    self.add_asset(policy, name, &amount.quantity)
                }
            }
        }
        self.prune();
        Ok(())
    }

    /// Remove zero-quantity assets, then bundles left without assets
    pub fn prune(&mut self) {
        for (_, bundle) in self.assets.iter_mut() {
            bundle.retain(|asset| asset.amount != UBig::ZERO);
        }
        self.assets.retain(|(_, bundle)| !bundle.is_empty());
    }
}

impl AddAssign<&Value> for Value {
    fn add_assign(&mut self, other: &Value) {
        self.coin += &other.coin;
        for (policy_id, other_assets) in &other.assets {
            for asset in other_assets {
                self.add_asset(*policy_id, asset.name, &asset.amount);
            }
        }
        self.prune();
    }
}
