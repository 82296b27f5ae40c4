//! Cardano Shelley-era payment addresses

use std::{fmt, str::FromStr};

use bech32::{Bech32, Hrp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("Invalid bech32 address: {0}")]
    Bech32(#[from] bech32::DecodeError),

    #[error("Cannot encode address: {0}")]
    Encode(#[from] bech32::EncodeError),

    #[error("Unexpected address prefix '{0}'")]
    Prefix(String),

    #[error("Empty address data")]
    Empty,
}

/// Address network, from the low nibble of the header byte
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AddressNetwork {
    Main,
    #[default]
    Test,
}

impl AddressNetwork {
    fn hrp(&self) -> &'static str {
        match self {
            AddressNetwork::Main => "addr",
            AddressNetwork::Test => "addr_test",
        }
    }

    fn header_bits(&self) -> u8 {
        match self {
            AddressNetwork::Main => 1,
            AddressNetwork::Test => 0,
        }
    }
}

/// A payment address, kept as the raw bytes that go into outputs
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    bytes: Vec<u8>,
}

impl Address {
    /// Read from addr1... / addr_test1... form
    pub fn from_bech32(text: &str) -> Result<Self, AddressError> {
        let (hrp, data) = bech32::decode(text)?;
        if hrp.as_str() != "addr" && hrp.as_str() != "addr_test" {
            return Err(AddressError::Prefix(hrp.to_string()));
        }
        if data.is_empty() {
            return Err(AddressError::Empty);
        }
        Ok(Self { bytes: data })
    }

    /// Enterprise address (no delegation part) for a payment key hash
    pub fn enterprise(network: AddressNetwork, key_hash: &[u8]) -> Self {
        let mut bytes = vec![0x60 | network.header_bits()];
        bytes.extend_from_slice(key_hash);
        Self { bytes }
    }

    pub fn network(&self) -> AddressNetwork {
        match self.bytes.first().map(|header| header & 0x0f) {
            Some(1) => AddressNetwork::Main,
            _ => AddressNetwork::Test,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Convert to addr1... form
    pub fn to_bech32(&self) -> Result<String, AddressError> {
        let hrp = Hrp::parse_unchecked(self.network().hrp());
        Ok(bech32::encode::<Bech32>(hrp, &self.bytes)?)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_bech32() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str(&hex::encode(&self.bytes)),
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Address").field(&self.to_string()).finish()
    }
}
