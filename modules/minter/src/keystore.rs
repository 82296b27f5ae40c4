//! Account and policy keys, persisted in the data directory

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use minter_cardano::policy::MintingPolicy;
use minter_common::{
    Address, configuration::Network, crypto::SigningKey, script::NativeScript,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Persisted form of the minting policy
#[derive(Serialize, Deserialize)]
struct PolicyFile {
    script: NativeScript,
    signing_key: String,
}

pub struct Keystore {
    /// Key of the minter's own account, which co-signs every mint
    pub account: SigningKey,
    pub policy: MintingPolicy,
}

impl Keystore {
    /// Load `<network>_account` and `<network>_policy` from `data_dir`,
    /// creating either with a fresh key when it does not exist yet
    pub fn load_or_create(data_dir: &Path, network: Network) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Cannot create data directory {}", data_dir.display()))?;

        let account_path = data_dir.join(format!("{network}_account"));
        let account = if account_path.exists() {
            read_account(&account_path)?
        } else {
            let key = SigningKey::generate();
            write_secret(&account_path, &key.to_hex())?;
            info!("Created new account key in {}", account_path.display());
            key
        };

        let policy_path = data_dir.join(format!("{network}_policy"));
        let policy = if policy_path.exists() {
            read_policy(&policy_path)?
        } else {
            let policy = MintingPolicy::single_signer(SigningKey::generate());
            let file = PolicyFile {
                script: policy.script.clone(),
                signing_key: policy.key.to_hex(),
            };
            write_secret(&policy_path, &serde_json::to_string_pretty(&file)?)?;
            info!("Created new policy {}", policy.policy_id());
            policy
        };

        let address = Address::enterprise(network.address_network(), &*account.key_hash());
        info!("Account address: {address}");
        info!("Minting policy: {}", policy.policy_id());

        Ok(Self { account, policy })
    }
}

fn read_account(path: &Path) -> Result<SigningKey> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read account key {}", path.display()))?;
    text.trim()
        .parse::<SigningKey>()
        .with_context(|| format!("Invalid account key in {}", path.display()))
}

fn read_policy(path: &Path) -> Result<MintingPolicy> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read policy {}", path.display()))?;
    let file: PolicyFile = serde_json::from_str(&text)
        .with_context(|| format!("Invalid policy file {}", path.display()))?;
    let policy = MintingPolicy {
        script: file.script,
        key: file
            .signing_key
            .parse()
            .with_context(|| format!("Invalid policy key in {}", path.display()))?,
    };
    if !policy.key_matches_script() {
        bail!("Policy key in {} is not required by its script", path.display());
    }
    Ok(policy)
}

fn write_secret(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Cannot write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
