//! The minting policy: a single-signer native script and its key

use minter_common::{PolicyId, crypto::SigningKey, script::NativeScript};

#[derive(Debug, Clone)]
pub struct MintingPolicy {
    pub script: NativeScript,
    pub key: SigningKey,
}

impl MintingPolicy {
    /// Policy requiring a signature from `key`
    pub fn single_signer(key: SigningKey) -> Self {
        Self {
            script: NativeScript::single_signer(key.key_hash()),
            key,
        }
    }

    pub fn policy_id(&self) -> PolicyId {
        self.script.policy_id()
    }

    /// Whether the key is one the script asks a signature of
    pub fn key_matches_script(&self) -> bool {
        self.script.key_hashes().contains(&self.key.key_hash())
    }
}
