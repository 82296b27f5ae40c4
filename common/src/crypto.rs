//! Hashing and ed25519 signing keys used by the minter

use crate::hash::{AddrKeyhash, Hash};
use blake2::{
    digest::consts::{U28, U32},
    Blake2b, Digest,
};
use cryptoxide::ed25519::{self, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Blake2b-224 of some bytes
pub fn blake2b_224(data: &[u8]) -> Hash<28> {
    let mut hasher = Blake2b::<U28>::new();
    hasher.update(data);
    let mut out = [0u8; 28];
    out.copy_from_slice(&hasher.finalize());
    Hash::new(out)
}

/// Blake2b-256 of some bytes
pub fn blake2b_256(data: &[u8]) -> Hash<32> {
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Hash::new(out)
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Invalid key size, expecting {0} bytes")]
    InvalidSize(usize),

    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

pub const SEED_LENGTH: usize = 32;

/// Ed25519 signing key, kept as its 32 byte seed
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    seed: [u8; SEED_LENGTH],
    public: VerificationKey,
}

/// Ed25519 verification key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerificationKey([u8; PUBLIC_KEY_LENGTH]);

/// Ed25519 signature
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl SigningKey {
    pub fn from_seed(seed: [u8; SEED_LENGTH]) -> Self {
        let (_, public) = ed25519::keypair(&seed);
        Self {
            seed,
            public: VerificationKey(public),
        }
    }

    /// Fresh key from the thread-local RNG
    pub fn generate() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn verification_key(&self) -> VerificationKey {
        self.public
    }

    pub fn key_hash(&self) -> AddrKeyhash {
        self.public.key_hash()
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        let (extended, _) = ed25519::keypair(&self.seed);
        Signature(ed25519::signature(message, &extended))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.seed)
    }
}

// Never print the seed
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey").field("public", &self.public).finish_non_exhaustive()
    }
}

impl FromStr for SigningKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())?;
        let seed: [u8; SEED_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidSize(SEED_LENGTH))?;
        Ok(Self::from_seed(seed))
    }
}

impl VerificationKey {
    pub const SIZE: usize = PUBLIC_KEY_LENGTH;

    pub fn key_hash(&self) -> AddrKeyhash {
        blake2b_224(&self.0)
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        ed25519::verify(message, &self.0, &signature.0)
    }
}

impl Signature {
    pub const SIZE: usize = SIGNATURE_LENGTH;
}

impl AsRef<[u8]> for VerificationKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for VerificationKey {
    type Error = KeyError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        value.try_into().map(Self).map_err(|_| KeyError::InvalidSize(Self::SIZE))
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = KeyError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        value.try_into().map(Self).map_err(|_| KeyError::InvalidSize(Self::SIZE))
    }
}

impl fmt::Display for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VerificationKey<Ed25519>").field(&hex::encode(self.0)).finish()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature<Ed25519>").field(&hex::encode(self.0)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn blake2b_224_of_empty_input() {
        assert_eq!(
            blake2b_224(&[]).to_string(),
            "836cc68931c2e4e3e838602eca1902591d216837bafddfe6f0c8cb07"
        );
    }

    #[test]
    fn blake2b_256_of_empty_input() {
        assert_eq!(
            blake2b_256(&[]).to_string(),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn seed_hex_roundtrip_keeps_public_key() {
        let key = SigningKey::generate();
        let back: SigningKey = key.to_hex().parse().unwrap();
        assert_eq!(back.verification_key(), key.verification_key());
    }

    #[test]
    fn short_seed_is_rejected() {
        assert!(matches!(
            "abcd".parse::<SigningKey>(),
            Err(KeyError::InvalidSize(SEED_LENGTH))
        ));
    }

    #[test]
    fn debug_hides_seed() {
        let key = SigningKey::from_seed([7; 32]);
        assert!(!format!("{key:?}").contains(&key.to_hex()));
    }

    #[quickcheck]
    fn signature_verifies(seed: Vec<u8>, message: Vec<u8>) -> bool {
        let mut bytes = [0u8; SEED_LENGTH];
        for (dst, src) in bytes.iter_mut().zip(seed) {
            *dst = src;
        }
        let key = SigningKey::from_seed(bytes);
        let signature = key.sign(&message);
        key.verification_key().verify(&message, &signature)
    }

    #[quickcheck]
    fn tampered_message_fails(message: Vec<u8>) -> bool {
        let key = SigningKey::from_seed([1; 32]);
        let signature = key.sign(&message);
        let mut other = message.clone();
        other.push(0);
        !key.verification_key().verify(&other, &signature)
    }
}
