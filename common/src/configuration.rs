use serde::Deserialize;
use std::fmt::{Display, Formatter, Result};

use crate::address::AddressNetwork;

/// Network the minter works against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
}

impl Network {
    pub fn address_network(&self) -> AddressNetwork {
        match self {
            Network::Mainnet => AddressNetwork::Main,
            Network::Testnet => AddressNetwork::Test,
        }
    }

    /// Blockfrost endpoint used when none is configured
    pub fn default_blockfrost_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://cardano-mainnet.blockfrost.io/api/v0",
            Network::Testnet => "https://cardano-preprod.blockfrost.io/api/v0",
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}
